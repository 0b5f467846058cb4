//! Category forest model and derived views for Canopy
//!
//! This crate provides:
//! - The server-seeded `Category` node shape
//! - Pure traversal/query utilities (flatten, slug lookup, ancestor chain, containment)
//! - `CategoryTree`, an id/slug index built once per snapshot
//! - Selection and accordion expansion state derived from a snapshot

pub mod category;
pub mod expansion;
pub mod tree;

// Re-exports
pub use category::{Category, CategoryId};
pub use expansion::{Expansion, Selection};
pub use tree::{ancestor_chain, contains_descendant, find_by_slug, flatten, CategoryTree};
