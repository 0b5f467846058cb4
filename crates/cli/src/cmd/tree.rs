//! Print the category tree

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::{bail, Result};
use canopy_core::Selection;
use owo_colors::OwoColorize;

/// With `focus`, only the branches leading to that category are expanded
pub async fn run(config: &SystemConfig, focus: Option<&str>) -> Result<()> {
    let tree = super::fetch_tree(config).await?;

    if tree.is_empty() {
        println!("{}", "No categories yet. Add one with 'canopy add <name>'.".dimmed());
        return Ok(());
    }

    let lines = match focus {
        Some(slug) => {
            let selection = Selection::from_slug(Some(slug));
            let Some(selected) = selection.selected(&tree) else {
                bail!("No category with slug '{}'", slug);
            };
            let expansion = selection.expansion_for(&tree);
            util::render_tree(&tree, Some(&expansion), Some(selected.id))
        }
        None => util::render_tree(&tree, None, None),
    };

    for line in lines {
        println!("{}", line);
    }
    println!("\n{}", format!("{} categories", tree.len()).dimmed());

    Ok(())
}
