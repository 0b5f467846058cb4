//! reqwest-backed implementation of the category and variant APIs

use crate::wire::{self, TreeResponse, VariantResponse};
use async_trait::async_trait;
use canopy_core::{Category, CategoryId};
use canopy_filter::{SearchError, VariantSource, VariantSummary};
use canopy_manage::{ApiError, CategoryApi, MoveCategory, NewCategory, RenameCategory};
use reqwest::{header, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Connection settings for `HttpClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root under which `categories` and `variants` live, e.g. `https://shop.test/admin`
    pub base_url: String,
    pub timeout: Duration,
    /// Sent as `Authorization: Bearer <token>` when present
    pub api_token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            api_token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

trait WithAuth {
    fn with_auth(self, token: Option<&str>) -> Self;
}

impl WithAuth for RequestBuilder {
    fn with_auth(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.bearer_auth(token),
            None => self,
        }
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// JSON client for a Canopy-compatible backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url,
                reason: "expected an http(s) url".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("canopy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base url extended by `segments`
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: reqwest::Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .with_auth(self.api_token.as_deref())
    }

    /// Send a mutation and read back the refreshed forest
    ///
    /// An empty success body (e.g. `204 No Content`) triggers a fresh fetch.
    async fn send_tree(&self, request: RequestBuilder) -> Result<Vec<Category>, ApiError> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = wire::error_from_response(status.as_u16(), &body);
            warn!("Request rejected with {}: {}", status, err);
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(transport)?;
        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            debug!("Empty response body, refetching tree");
            return self.fetch_tree().await;
        }

        serde_json::from_slice::<TreeResponse>(&bytes)
            .map(TreeResponse::into_roots)
            .map_err(|e| ApiError::Transport(format!("malformed category response: {}", e)))
    }
}

#[async_trait]
impl CategoryApi for HttpClient {
    async fn fetch_tree(&self) -> Result<Vec<Category>, ApiError> {
        let response = self
            .request(reqwest::Method::GET, &["categories"])
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(wire::error_from_response(status.as_u16(), &body));
        }

        response
            .json::<TreeResponse>()
            .await
            .map(TreeResponse::into_roots)
            .map_err(|e| ApiError::Transport(format!("malformed category response: {}", e)))
    }

    async fn create(&self, category: &NewCategory) -> Result<Vec<Category>, ApiError> {
        let request = self
            .request(reqwest::Method::POST, &["categories"])
            .json(category);
        self.send_tree(request).await
    }

    async fn rename(&self, id: CategoryId, body: &RenameCategory) -> Result<Vec<Category>, ApiError> {
        let id = id.to_string();
        let request = self
            .request(reqwest::Method::PATCH, &["categories", &id])
            .json(body);
        self.send_tree(request).await
    }

    async fn reparent(&self, id: CategoryId, body: &MoveCategory) -> Result<Vec<Category>, ApiError> {
        let id = id.to_string();
        let request = self
            .request(reqwest::Method::PATCH, &["categories", &id, "move"])
            .json(body);
        self.send_tree(request).await
    }

    async fn delete(&self, id: CategoryId) -> Result<Vec<Category>, ApiError> {
        let id = id.to_string();
        let request = self.request(reqwest::Method::DELETE, &["categories", &id]);
        self.send_tree(request).await
    }
}

#[async_trait]
impl VariantSource for HttpClient {
    async fn search_variants(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<VariantSummary>, SearchError> {
        let limit = limit.to_string();
        let response = self
            .request(reqwest::Method::GET, &["variants", "search"])
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Failed(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = wire::error_from_response(status.as_u16(), &body);
            return Err(SearchError::Failed(err.to_string()));
        }

        response
            .json::<VariantResponse>()
            .await
            .map(VariantResponse::into_variants)
            .map_err(|e| SearchError::Failed(format!("malformed variant response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpClient::new(ClientConfig::new("https://shop.test/admin/")).unwrap();
        assert_eq!(
            client.endpoint(&["categories", "7", "move"]).as_str(),
            "https://shop.test/admin/categories/7/move"
        );

        let client = HttpClient::new(ClientConfig::new("https://shop.test")).unwrap();
        assert_eq!(
            client.endpoint(&["categories"]).as_str(),
            "https://shop.test/categories"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(
            HttpClient::new(ClientConfig::new("mailto:shop@test")),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpClient::new(ClientConfig::new("not a url")),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }
}
