//! Errors surfaced by the management session

use crate::api::{ApiError, FieldErrors};
use canopy_core::CategoryId;

/// Why an intent did not complete
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManageError {
    /// The server refused or never answered
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Intent needs a different pending operation
    #[error("no matching operation is pending")]
    NothingPending,
    #[error("category name cannot be empty")]
    EmptyName,
    #[error("category {0} has children and cannot be deleted")]
    HasChildren(CategoryId),
    #[error("category {category} cannot be moved under {target}")]
    InvalidMoveTarget {
        category: CategoryId,
        target: CategoryId,
    },
    #[error("category {0} is already at the top level")]
    AlreadyTopLevel(CategoryId),
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),
    /// A mutation is already in flight
    #[error("another request is in flight")]
    Busy,
}

impl ManageError {
    /// Field-keyed messages for inline display, if the server sent them
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ManageError::Api(ApiError::Validation(fields)) => Some(fields),
            _ => None,
        }
    }

    /// True when the request never left the client
    pub fn is_client_side(&self) -> bool {
        !matches!(self, ManageError::Api(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_only_for_validation() {
        let mut fields = FieldErrors::new();
        fields.insert("name".to_string(), vec!["required".to_string()]);

        let err = ManageError::from(ApiError::Validation(fields.clone()));
        assert_eq!(err.field_errors(), Some(&fields));
        assert!(!err.is_client_side());

        let err = ManageError::from(ApiError::Transport("timed out".to_string()));
        assert!(err.field_errors().is_none());
        assert_eq!(err.to_string(), "request failed: timed out");

        assert!(ManageError::HasChildren(1).is_client_side());
    }
}
