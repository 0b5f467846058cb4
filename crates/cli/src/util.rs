//! Shared utilities for CLI commands

use anyhow::{anyhow, Result};
use canopy_core::{Category, CategoryId, CategoryTree, Expansion};
use canopy_manage::ManageError;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Spinner on stderr; hidden when stderr is not a terminal
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Await `fut` behind a spinner
pub async fn with_spinner<F: Future>(message: &str, fut: F) -> F::Output {
    let pb = spinner(message);
    let output = fut.await;
    pb.finish_and_clear();
    output
}

/// Turn a session error into something worth printing
pub fn explain(err: ManageError) -> anyhow::Error {
    if let Some(fields) = err.field_errors() {
        let detail: Vec<String> = fields
            .iter()
            .map(|(field, messages)| format!("  {}: {}", field, messages.join(", ")))
            .collect();
        return anyhow!("Server rejected the request:\n{}", detail.join("\n"));
    }
    if err.is_client_side() {
        return anyhow!("{} (nothing was sent)", err);
    }
    anyhow::Error::new(err)
}

/// Ask a yes/no question on stdin, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Breadcrumb joined for display
pub fn format_breadcrumb(names: &[&str]) -> String {
    names.join(" › ")
}

/// Render the forest as an indented tree
///
/// With an expansion only the open path shows its children; collapsed
/// nodes report how many children they hide.
pub fn render_tree(
    tree: &CategoryTree,
    expansion: Option<&Expansion>,
    highlight: Option<CategoryId>,
) -> Vec<String> {
    let mut lines = Vec::new();
    let roots = tree.roots();
    for (i, root) in roots.iter().enumerate() {
        render_node(
            tree,
            root,
            "",
            i + 1 == roots.len(),
            expansion,
            highlight,
            &mut lines,
        );
    }
    lines
}

fn render_node(
    tree: &CategoryTree,
    node: &Category,
    prefix: &str,
    last: bool,
    expansion: Option<&Expansion>,
    highlight: Option<CategoryId>,
    lines: &mut Vec<String>,
) {
    let connector = if last { "└── " } else { "├── " };
    let open = match expansion {
        Some(expansion) => expansion.is_open(tree, node.id),
        None => true,
    };

    let name = if highlight == Some(node.id) {
        node.name.green().bold().to_string()
    } else {
        node.name.clone()
    };
    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        name,
        format!("#{} {}", node.id, node.slug).dimmed()
    );
    if !open && !node.children.is_empty() {
        line.push_str(&format!(" {}", format!("(+{})", node.children.len()).yellow()));
    }
    lines.push(line);

    if !open {
        return;
    }
    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    for (i, child) in node.children.iter().enumerate() {
        render_node(
            tree,
            child,
            &child_prefix,
            i + 1 == node.children.len(),
            expansion,
            highlight,
            lines,
        );
    }
}
