//! Canopy CLI - canopy command

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod cmd;
mod system_config;
mod util;

/// Canopy - category tree management for a storefront backend
#[derive(Parser)]
#[command(name = "canopy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: $CONFIG_DIR/canopy/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v for debug output on stderr)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the category tree
    Tree {
        /// Only open the branches leading to this category
        #[arg(long)]
        focus: Option<String>,
    },
    /// Show a category with its breadcrumb
    Show {
        /// Category slug
        slug: String,
    },
    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Parent category ID (default: top level)
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Rename a category
    Rename {
        /// Category ID
        id: i64,
        /// New name
        name: String,
    },
    /// Move a category under another one or to the top level
    Move {
        /// Category ID
        id: i64,
        /// New parent category ID
        #[arg(long, conflicts_with = "top", required_unless_present = "top")]
        to: Option<i64>,
        /// Move to the top level
        #[arg(long)]
        top: bool,
    },
    /// Delete a category without children
    Delete {
        /// Category ID
        id: i64,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Search product variants
    Variants {
        /// Search text
        query: String,
        /// Maximum results (default: search.variant_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Attach these variant IDs from the results
        #[arg(long, num_args = 1..)]
        pick: Vec<i64>,
    },
    /// Drive the storefront filters from stdin and print each navigation
    Listing {
        /// Query string the page was loaded with
        #[arg(long, default_value = "")]
        url: String,
        /// Treat the load as a full page reload
        #[arg(long)]
        reload: bool,
    },
    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Get a single value
    Get {
        /// Key, e.g. server.base_url
        key: String,
    },
    /// Set a single value
    Set {
        /// Key, e.g. server.base_url
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if it does not exist
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

fn init_logging(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = system_config::resolve_path(cli.config)?;

    let command = match cli.command {
        Commands::Config(config_cmd) => return run_config(&config_path, config_cmd),
        command => command,
    };

    let config = system_config::load_from(&config_path)?.with_env_overrides();

    match command {
        Commands::Tree { focus } => cmd::tree::run(&config, focus.as_deref()).await,
        Commands::Show { slug } => cmd::show::run(&config, &slug).await,
        Commands::Add { name, parent } => cmd::add::run(&config, &name, parent).await,
        Commands::Rename { id, name } => cmd::rename::run(&config, id, &name).await,
        Commands::Move { id, to, top } => {
            let target = if top { None } else { to };
            cmd::reparent::run(&config, id, target).await
        }
        Commands::Delete { id, yes } => cmd::delete::run(&config, id, yes).await,
        Commands::Variants { query, limit, pick } => {
            cmd::variants::run(&config, &query, limit, &pick).await
        }
        Commands::Listing { url, reload } => cmd::listing::run(&config, &url, reload).await,
        Commands::Config(config_cmd) => run_config(&config_path, config_cmd),
    }
}

fn run_config(path: &Path, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::List => cmd::config::run_list(path),
        ConfigCommands::Get { key } => cmd::config::run_get(path, &key),
        ConfigCommands::Set { key, value } => cmd::config::run_set(path, &key, &value),
        ConfigCommands::Path { create } => cmd::config::run_path(path, create),
        ConfigCommands::Example => cmd::config::run_example(),
    }
}
