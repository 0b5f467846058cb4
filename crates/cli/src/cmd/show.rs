//! Show a category with its breadcrumb and children

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;

pub async fn run(config: &SystemConfig, slug: &str) -> Result<()> {
    let tree = super::fetch_tree(config).await?;

    let Some(category) = tree.by_slug(slug) else {
        bail!("No category with slug '{}'", slug);
    };

    println!("{}", category.name.bold());
    println!(
        "  {} {}",
        "Path:".dimmed(),
        util::format_breadcrumb(&tree.breadcrumb_for_slug(slug))
    );
    println!("  {} {}", "ID:".dimmed(), category.id.cyan());
    println!("  {} {}", "Slug:".dimmed(), category.slug);

    match tree.parent_of(category.id) {
        Some(parent) => println!("  {} {} (#{})", "Parent:".dimmed(), parent.name, parent.id),
        None => println!("  {} {}", "Parent:".dimmed(), "(top level)".dimmed()),
    }
    if let Some(depth) = tree.depth(category.id) {
        println!("  {} {}", "Depth:".dimmed(), depth);
    }

    let descendants = tree.descendant_ids(category.id).len();
    println!(
        "  {} {} direct, {} total",
        "Children:".dimmed(),
        category.children.len(),
        descendants
    );
    for child in &category.children {
        println!("    • {} {}", child.name, format!("#{} {}", child.id, child.slug).dimmed());
    }

    if !tree.can_delete(category.id) {
        println!(
            "\n{}",
            "Has children: move or delete them before deleting this category".yellow()
        );
    }

    Ok(())
}
