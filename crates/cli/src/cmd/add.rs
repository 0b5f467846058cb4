//! Add a category

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::Result;
use canopy_core::CategoryId;
use owo_colors::OwoColorize;

pub async fn run(config: &SystemConfig, name: &str, parent: Option<CategoryId>) -> Result<()> {
    let session = super::open_session(config).await?;
    session.begin_add(parent).map_err(util::explain)?;

    let tree = util::with_spinner("Creating category", session.create(name))
        .await
        .map_err(util::explain)?;

    // Server assigns the id; newest sibling with this name is ours
    let name = name.trim();
    let created = tree
        .flatten()
        .into_iter()
        .filter(|c| c.name == name && c.parent_id == parent)
        .max_by_key(|c| c.id);

    match created {
        Some(category) => println!(
            "{} Created {} {}",
            "✓".green(),
            util::format_breadcrumb(&tree.breadcrumb(category.id)).yellow(),
            format!("#{} {}", category.id, category.slug).dimmed()
        ),
        None => println!("{} Created '{}'", "✓".green(), name.yellow()),
    }

    Ok(())
}
