//! Configuration management command
//!
//! Provides CLI interface to view and edit the config file.

use crate::system_config::{self, SystemConfig, SERVER_ENV};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

/// List all configuration values
pub fn run_list(path: &Path) -> Result<()> {
    let config = system_config::load_from(path)?;

    println!("{}", "Canopy Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), path.display().dimmed());

    println!("{}", "[server]".yellow());
    println!("  {} = {}", "base_url".cyan(), config.server.base_url);
    if let Ok(server) = std::env::var(SERVER_ENV) {
        println!(
            "  {}",
            format!("(overridden by {}={})", SERVER_ENV, server).dimmed()
        );
    }
    println!(
        "  {} = {} {}",
        "timeout_secs".cyan(),
        config.server.timeout_secs,
        format!("({}s)", config.server.timeout_secs).dimmed()
    );
    println!(
        "  {} = {}",
        "api_token".cyan(),
        if config.server.api_token.is_some() {
            "(set)".to_string()
        } else {
            "(none)".dimmed().to_string()
        }
    );

    println!("\n{}", "[filter]".yellow());
    println!(
        "  {} = {} {}",
        "search_debounce_ms".cyan(),
        config.filter.search_debounce_ms,
        format!("({}ms)", config.filter.search_debounce_ms).dimmed()
    );

    println!("\n{}", "[search]".yellow());
    println!("  {} = {}", "variant_limit".cyan(), config.search.variant_limit);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  timeout_secs: 1-300");
    println!("  search_debounce_ms: 300-500");
    println!("  variant_limit: 1-100");

    Ok(())
}

/// Get a single configuration value
pub fn run_get(path: &Path, key: &str) -> Result<()> {
    let config = system_config::load_from(path)?;
    println!("{}", config.get(key)?);
    Ok(())
}

/// Set a configuration value
pub fn run_set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config: SystemConfig = system_config::load_from(path)?;
    config.set(key, value)?;

    // Validate before saving
    config.validate().context("Invalid configuration value")?;

    system_config::save_to(&config, path)?;

    let shown = if key == "server.api_token" { "(hidden)" } else { value };
    println!("{} {} = {}", "✓".green(), key.cyan(), shown);
    Ok(())
}

/// Show the config file path and optionally create it
pub fn run_path(path: &Path, create: bool) -> Result<()> {
    if create && system_config::init_if_missing(path)? {
        println!("{} Created config file at: {}", "✓".green(), path.display());
        return Ok(());
    }

    println!("{}", path.display());
    if !path.exists() {
        println!("{}", "File does not exist. Use --create to create it.".yellow());
    }
    Ok(())
}

/// Show example configuration
pub fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}
