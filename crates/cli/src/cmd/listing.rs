//! Storefront listing filters driven from stdin
//!
//! Each input line is one interaction:
//! `search <text>`, `category [slug]`, `sort [order]`, `reset`, `quit`.
//! Every navigation the filters produce is printed as the listing URL
//! query, followed by the selected category's breadcrumb.

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::Result;
use canopy_core::{CategoryTree, Selection};
use canopy_filter::{FilterState, FilterSync, NavigationKind, SortOrder};
use owo_colors::OwoColorize;
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub async fn run(config: &SystemConfig, url: &str, reload: bool) -> Result<()> {
    let tree = super::fetch_tree(config).await?;

    let (sync, mut navigations) = FilterSync::new(config.search_debounce());
    let kind = if reload {
        NavigationKind::Reload
    } else {
        NavigationKind::Navigate
    };

    let state = sync.on_page_load(kind, url);
    if state.is_default() {
        println!("{}", "Loaded with no filters".dimmed());
    } else {
        println!("{} ?{}", "Loaded with".dimmed(), state.to_query());
    }

    let printer = tokio::spawn(async move {
        while let Some(request) = navigations.recv().await {
            println!("{}", describe(&tree, &request.query));
        }
    });

    // Stdin blocks, so it gets its own thread
    let (lines_tx, mut lines) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = lines.recv().await {
        if !apply(&sync, &line) {
            break;
        }
    }

    // Let a pending search settle before closing the channel
    tokio::time::sleep(config.search_debounce() + Duration::from_millis(50)).await;
    drop(sync);
    printer.await?;

    Ok(())
}

/// Apply one input line; false ends the session
fn apply(sync: &FilterSync, line: &str) -> bool {
    let line = line.trim();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };
    debug!("Listing input: {} {:?}", verb, arg);

    match verb {
        "" => {}
        "search" => sync.set_search(arg),
        "category" => sync.select_category((!arg.is_empty()).then_some(arg)),
        "sort" if arg.is_empty() => sync.set_sort(None),
        "sort" => match arg.parse::<SortOrder>() {
            Ok(order) => sync.set_sort(Some(order)),
            Err(e) => eprintln!("{} {}", "warning:".yellow(), e),
        },
        "reset" => sync.reset(),
        "quit" | "exit" => return false,
        other => eprintln!(
            "{} unknown input '{}' (search, category, sort, reset, quit)",
            "warning:".yellow(),
            other
        ),
    }
    true
}

/// `→ ?query  Breadcrumb`, or `→ /` for the unfiltered listing
fn describe(tree: &CategoryTree, query: &str) -> String {
    let target = if query.is_empty() {
        "/".to_string()
    } else {
        format!("?{}", query)
    };

    let state = FilterState::from_query(query);
    let selection = Selection::from_slug(state.category.as_deref());
    let breadcrumb = selection.breadcrumb(tree);

    match (selection.slug(), breadcrumb.is_empty()) {
        (None, _) => format!("→ {}", target),
        (Some(slug), true) => format!("→ {}  {}", target, format!("(unknown category '{}')", slug).yellow()),
        (Some(_), false) => format!("→ {}  {}", target, util::format_breadcrumb(&breadcrumb).dimmed()),
    }
}
