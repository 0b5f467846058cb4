//! Move a category under a new parent or to the top level

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::Result;
use canopy_core::CategoryId;
use owo_colors::OwoColorize;

/// `target` of `None` moves to the top level
pub async fn run(config: &SystemConfig, id: CategoryId, target: Option<CategoryId>) -> Result<()> {
    let session = super::open_session(config).await?;

    let result = match target {
        Some(target) => {
            session.begin_move(id).map_err(util::explain)?;
            util::with_spinner("Moving category", session.drop_on(target)).await
        }
        None => util::with_spinner("Moving category", session.move_to_top(id)).await,
    };
    let tree = result.map_err(util::explain)?;

    let path = tree.breadcrumb(id);
    if path.is_empty() {
        println!("{} Moved #{}", "✓".green(), id);
    } else {
        println!(
            "{} Moved #{} to {}",
            "✓".green(),
            id,
            util::format_breadcrumb(&path).yellow()
        );
    }

    Ok(())
}
