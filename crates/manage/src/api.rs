//! Server contract for category mutations
//!
//! Every call answers with the refreshed forest. Callers never patch their
//! snapshot in place.

use async_trait::async_trait;
use canopy_core::{Category, CategoryId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name -> messages, as returned for rejected input
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Failure reported by the server boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input rejected, keyed by field
    #[error("{}", summarize(.0))]
    Validation(FieldErrors),
    /// Request never produced a usable response
    #[error("request failed: {0}")]
    Transport(String),
    /// Target no longer exists
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-success answer
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

fn summarize(errors: &FieldErrors) -> String {
    let parts: Vec<String> = errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect();
    if parts.is_empty() {
        "validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

/// Body of a rename request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameCategory {
    pub name: String,
}

/// Body of a reparent request, `None` moves to the top level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCategory {
    pub parent_id: Option<CategoryId>,
}

/// Category endpoints consumed by the admin panel
#[async_trait]
pub trait CategoryApi: Send + Sync {
    /// Current forest
    async fn fetch_tree(&self) -> Result<Vec<Category>, ApiError>;

    /// Add a category under `request.parent_id`
    async fn create(&self, request: &NewCategory) -> Result<Vec<Category>, ApiError>;

    /// Rename a category
    async fn rename(&self, id: CategoryId, request: &RenameCategory)
        -> Result<Vec<Category>, ApiError>;

    /// Reparent a category
    async fn reparent(&self, id: CategoryId, request: &MoveCategory)
        -> Result<Vec<Category>, ApiError>;

    /// Delete a leaf category
    async fn delete(&self, id: CategoryId) -> Result<Vec<Category>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_bodies_use_wire_names() {
        let create = NewCategory {
            name: "Tablets".to_string(),
            parent_id: None,
        };
        assert_eq!(
            serde_json::to_string(&create).unwrap(),
            r#"{"name":"Tablets","parentId":null}"#
        );

        let move_req = MoveCategory { parent_id: Some(4) };
        assert_eq!(serde_json::to_string(&move_req).unwrap(), r#"{"parentId":4}"#);
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("name".to_string(), vec!["has already been taken".to_string()]);

        let err = ApiError::Validation(fields);
        assert_eq!(err.to_string(), "name: has already been taken");
        assert_eq!(
            ApiError::Validation(FieldErrors::new()).to_string(),
            "validation failed"
        );
    }
}
