//! Search product variants and pick some for a discount

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::{bail, Result};
use canopy_filter::{AttachList, VariantSearch};
use owo_colors::OwoColorize;

pub async fn run(
    config: &SystemConfig,
    query: &str,
    limit: Option<usize>,
    pick: &[i64],
) -> Result<()> {
    let limit = limit.unwrap_or(config.search.variant_limit);
    if !(1..=100).contains(&limit) {
        bail!("--limit must be between 1 and 100 (got {})", limit);
    }

    let search = VariantSearch::new(super::client(config)?, limit);
    let found = util::with_spinner("Searching variants", search.search(query)).await?;

    if found.is_empty() {
        println!("{}", format!("No variants match '{}'", query.trim()).dimmed());
    }
    for variant in &found {
        let marker = if pick.contains(&variant.id) { "✓".green().to_string() } else { " ".to_string() };
        println!("{} {} {}", marker, format!("#{}", variant.id).cyan(), variant.label());
    }

    if pick.is_empty() {
        return Ok(());
    }

    let mut attached = AttachList::new();
    for id in pick {
        match found.iter().find(|v| v.id == *id) {
            Some(variant) => {
                attached.attach(variant.clone());
            }
            None => eprintln!(
                "{} variant #{} is not in the results, skipped",
                "warning:".yellow(),
                id
            ),
        }
    }

    let ids: Vec<String> = attached.ids().iter().map(|id| id.to_string()).collect();
    println!("\n{} {}", "Attached:".bold(), ids.join(","));
    Ok(())
}
