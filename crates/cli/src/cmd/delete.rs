//! Delete a category

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::Result;
use canopy_core::CategoryId;
use owo_colors::OwoColorize;

pub async fn run(config: &SystemConfig, id: CategoryId, yes: bool) -> Result<()> {
    let session = super::open_session(config).await?;

    // Refuses categories with children before anything is sent
    session.begin_delete(id).map_err(util::explain)?;

    let label = session
        .snapshot()
        .get(id)
        .map(|c| format!("'{}' (#{})", c.name, id))
        .unwrap_or_else(|| format!("#{}", id));

    if !yes && !util::confirm(&format!("Delete {}?", label))? {
        session.cancel().map_err(util::explain)?;
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    let tree = util::with_spinner("Deleting category", session.confirm_delete())
        .await
        .map_err(util::explain)?;

    println!(
        "{} Deleted {} ({} categories left)",
        "✓".green(),
        label.yellow(),
        tree.len()
    );
    Ok(())
}
