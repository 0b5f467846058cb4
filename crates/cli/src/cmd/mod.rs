//! CLI command implementations

pub mod add;
pub mod config;
pub mod delete;
pub mod listing;
pub mod rename;
pub mod reparent;
pub mod show;
pub mod tree;
pub mod variants;

use crate::system_config::SystemConfig;
use crate::util;
use anyhow::{Context, Result};
use canopy_client::HttpClient;
use canopy_core::CategoryTree;
use canopy_manage::{CategoryApi, ManagementSession};

pub(crate) fn client(config: &SystemConfig) -> Result<HttpClient> {
    HttpClient::new(config.client_config()).context("Invalid server configuration")
}

/// Fetch the current forest
pub(crate) async fn fetch_tree(config: &SystemConfig) -> Result<CategoryTree> {
    let client = client(config)?;
    let roots = util::with_spinner("Loading categories", client.fetch_tree())
        .await
        .with_context(|| format!("Failed to load categories from {}", client.base_url()))?;
    Ok(CategoryTree::from_roots(roots))
}

/// Management session over a freshly loaded forest
pub(crate) async fn open_session(config: &SystemConfig) -> Result<ManagementSession<HttpClient>> {
    let client = client(config)?;
    let base_url = client.base_url().to_string();
    util::with_spinner("Loading categories", ManagementSession::load(client))
        .await
        .map_err(util::explain)
        .with_context(|| format!("Failed to load categories from {}", base_url))
}
