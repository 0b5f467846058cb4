//! Admin variant search for the discount attach list
//!
//! A new query cancels the search still in flight. Results that come back
//! after a newer query was issued are discarded even if the source ignored
//! the cancellation.

use crate::sequence::RequestSequencer;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Product variant as listed in search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
}

impl VariantSummary {
    /// "Product / Variant (SKU)" for pickers
    pub fn label(&self) -> String {
        let mut label = match &self.product_name {
            Some(product) => format!("{} / {}", product, self.name),
            None => self.name.clone(),
        };
        if let Some(sku) = &self.sku {
            label.push_str(&format!(" ({})", sku));
        }
        label
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("variant search failed: {0}")]
    Failed(String),
    /// A newer query cancelled this one
    #[error("variant search cancelled")]
    Cancelled,
    /// Answer arrived after a newer query was issued
    #[error("variant search superseded")]
    Stale,
}

/// Backend answering variant queries
#[async_trait]
pub trait VariantSource: Send + Sync {
    async fn search_variants(&self, query: &str, limit: usize)
        -> Result<Vec<VariantSummary>, SearchError>;
}

/// Search box state for variant lookups
pub struct VariantSearch<S> {
    source: S,
    limit: usize,
    sequencer: RequestSequencer,
    in_flight: Mutex<Option<CancellationToken>>,
    results: Mutex<Vec<VariantSummary>>,
}

impl<S: VariantSource> VariantSearch<S> {
    /// Search returning at most `limit` variants per query
    pub fn new(source: S, limit: usize) -> Self {
        Self {
            source,
            limit,
            sequencer: RequestSequencer::new(),
            in_flight: Mutex::new(None),
            results: Mutex::new(Vec::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Latest accepted results
    pub fn results(&self) -> Vec<VariantSummary> {
        self.results.lock().clone()
    }

    /// Run `query`, cancelling whatever search is still running
    ///
    /// A blank query clears the results without contacting the source.
    pub async fn search(&self, query: &str) -> Result<Vec<VariantSummary>, SearchError> {
        let cancel = CancellationToken::new();
        // The search holding the in-flight slot must also hold the newest token
        let token = {
            let mut in_flight = self.in_flight.lock();
            if let Some(previous) = in_flight.replace(cancel.clone()) {
                previous.cancel();
            }
            self.sequencer.next()
        };

        let query = query.trim();
        if query.is_empty() {
            self.results.lock().clear();
            return Ok(Vec::new());
        }

        debug!("Searching variants for '{}' (request {})", query, token.get());
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Variant search for '{}' cancelled", query);
                return Err(SearchError::Cancelled);
            }
            outcome = self.source.search_variants(query, self.limit) => outcome,
        };

        let mut found = outcome?;
        found.truncate(self.limit);

        let mut results = self.results.lock();
        let found = self.sequencer.accept(token, found).ok_or(SearchError::Stale)?;
        *results = found.clone();
        Ok(found)
    }

    /// Cancel the running search, if any
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().take() {
            token.cancel();
        }
    }
}
