//! Mock storefront backend

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Electronics > Phones, Electronics > Audio, Books
pub fn forest() -> Value {
    json!([
        {
            "id": 1, "name": "Electronics", "slug": "electronics", "parentId": null,
            "children": [
                { "id": 2, "name": "Phones", "slug": "phones", "parentId": 1, "children": [] },
                { "id": 4, "name": "Audio", "slug": "audio", "parentId": 1, "children": [] }
            ]
        },
        { "id": 3, "name": "Books", "slug": "books", "parentId": null, "children": [] }
    ])
}

/// Mock server with the forest mounted, plus an empty config dir
pub struct Backend {
    pub server: MockServer,
    pub config_dir: TempDir,
}

impl Backend {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forest()))
            .mount(&server)
            .await;

        Self {
            server,
            config_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Base URL for `CANOPY_SERVER`
    pub fn base_url(&self) -> String {
        format!("{}/admin", self.server.uri())
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.toml")
    }
}
