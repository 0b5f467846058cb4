//! Rename a category

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::Result;
use canopy_core::CategoryId;
use owo_colors::OwoColorize;

pub async fn run(config: &SystemConfig, id: CategoryId, name: &str) -> Result<()> {
    let session = super::open_session(config).await?;
    let old_name = session.snapshot().get(id).map(|c| c.name.clone());

    session.begin_edit(id).map_err(util::explain)?;
    let tree = util::with_spinner("Renaming category", session.update(name))
        .await
        .map_err(util::explain)?;

    let new_name = tree
        .get(id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| name.trim().to_string());
    println!(
        "{} Renamed #{}: {} → {}",
        "✓".green(),
        id,
        old_name.unwrap_or_default().dimmed(),
        new_name.yellow()
    );

    Ok(())
}
