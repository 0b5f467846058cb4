//! Category management for the admin tree editor
//!
//! This crate provides:
//! - The server contract for structural mutations (`CategoryApi`)
//! - A shared, replace-only snapshot of the forest (`TreeContext`)
//! - The pending-operation state machine (`Pending`)
//! - `ManagementSession`, which arms one mutation at a time and reconciles
//!   by swapping in the forest the server returns

pub mod api;
pub mod context;
pub mod error;
pub mod session;
pub mod state;

// Re-exports
pub use api::{ApiError, CategoryApi, FieldErrors, MoveCategory, NewCategory, RenameCategory};
pub use context::TreeContext;
pub use error::ManageError;
pub use session::{ManagementSession, SessionState};
pub use state::Pending;

/// Result type for management operations
pub type Result<T> = std::result::Result<T, ManageError>;
