//! System configuration
//!
//! Lives at `$CONFIG_DIR/canopy/config.toml` unless `--config` points
//! elsewhere. A missing file means defaults. `CANOPY_SERVER` overrides the
//! server base URL.

use anyhow::{bail, Context, Result};
use canopy_client::ClientConfig;
use canopy_filter::debounce::{MAX_WINDOW, MIN_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `server.base_url`
pub const SERVER_ENV: &str = "CANOPY_SERVER";

/// Keys accepted by `config get` / `config set`
pub const KEYS: &[&str] = &[
    "server.base_url",
    "server.timeout_secs",
    "server.api_token",
    "filter.search_debounce_ms",
    "search.variant_limit",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub server: ServerConfig,
    pub filter: FilterConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/admin".to_string(),
            timeout_secs: 10,
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub search_debounce_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub variant_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { variant_limit: 20 }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.trim().is_empty() {
            bail!("server.base_url must not be empty");
        }
        if !(1..=300).contains(&self.server.timeout_secs) {
            bail!(
                "server.timeout_secs must be between 1 and 300 (got {})",
                self.server.timeout_secs
            );
        }

        let min = MIN_WINDOW.as_millis() as u64;
        let max = MAX_WINDOW.as_millis() as u64;
        if !(min..=max).contains(&self.filter.search_debounce_ms) {
            bail!(
                "filter.search_debounce_ms must be between {} and {} (got {})",
                min,
                max,
                self.filter.search_debounce_ms
            );
        }

        if !(1..=100).contains(&self.search.variant_limit) {
            bail!(
                "search.variant_limit must be between 1 and 100 (got {})",
                self.search.variant_limit
            );
        }
        Ok(())
    }

    /// Apply `CANOPY_SERVER` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(server) = std::env::var(SERVER_ENV) {
            if !server.trim().is_empty() {
                self.server.base_url = server.trim().to_string();
            }
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.server.base_url.clone())
            .with_timeout(Duration::from_secs(self.server.timeout_secs));
        match &self.server.api_token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.filter.search_debounce_ms)
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "server.base_url" => self.server.base_url.clone(),
            "server.timeout_secs" => self.server.timeout_secs.to_string(),
            "server.api_token" => self.server.api_token.clone().unwrap_or_default(),
            "filter.search_debounce_ms" => self.filter.search_debounce_ms.to_string(),
            "search.variant_limit" => self.search.variant_limit.to_string(),
            _ => bail!(
                "Unknown config key: {}. Use 'canopy config list' to see available keys.",
                key
            ),
        };
        Ok(value)
    }

    /// Set `key` from its string form; does not validate ranges
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.base_url" => self.server.base_url = value.trim().to_string(),
            "server.timeout_secs" => {
                self.server.timeout_secs = value
                    .parse()
                    .context("Invalid value: must be a positive integer")?;
            }
            "server.api_token" => {
                let token = value.trim();
                self.server.api_token = (!token.is_empty()).then(|| token.to_string());
            }
            "filter.search_debounce_ms" => {
                self.filter.search_debounce_ms = value
                    .parse()
                    .context("Invalid value: must be a positive integer")?;
            }
            "search.variant_limit" => {
                self.search.variant_limit = value
                    .parse()
                    .context("Invalid value: must be a positive integer")?;
            }
            _ => bail!(
                "Unknown config key: {}. Use 'canopy config list' to see available keys.",
                key
            ),
        }
        Ok(())
    }
}

/// Default config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("canopy").join("config.toml"))
}

/// `--config` if given, otherwise the default location
pub fn resolve_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => config_file_path().context("Could not determine config file path"),
    }
}

/// Load and validate; a missing file yields defaults
pub fn load_from(path: &Path) -> Result<SystemConfig> {
    if !path.exists() {
        return Ok(SystemConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

pub fn save_to(config: &SystemConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Write the example config if nothing exists at `path`; true if created
pub fn init_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, example_config())
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(true)
}

pub fn example_config() -> &'static str {
    r#"# Canopy configuration

[server]
# Root of the category and variant endpoints
base_url = "http://localhost:8000/admin"
# Request timeout in seconds (1-300)
timeout_secs = 10
# Bearer token sent with every request
# api_token = "..."

[filter]
# Wait after the last keystroke before searching (300-500 ms)
search_debounce_ms = 400

[search]
# Maximum variants returned per search (1-100)
variant_limit = 20
"#
}
