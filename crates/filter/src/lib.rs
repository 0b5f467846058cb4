//! Storefront filter synchronisation and admin variant search
//!
//! This crate provides:
//! - `FilterState` <-> URL query mapping that omits empty parameters
//! - `FilterSync`, which turns selection/search/sort changes into
//!   consolidated navigation requests (search debounced)
//! - Monotonic request tokens so late responses can be discarded
//! - Cancellable variant search and the discount attach list

pub mod attach;
pub mod debounce;
pub mod query;
pub mod search;
pub mod sequence;
pub mod sync;

// Re-exports
pub use attach::AttachList;
pub use debounce::{DebounceTicket, Debouncer};
pub use query::{FilterState, SortOrder};
pub use search::{SearchError, VariantSearch, VariantSource, VariantSummary};
pub use sequence::{RequestSequencer, RequestToken};
pub use sync::{FilterSync, NavigationKind, NavigationRequest};
