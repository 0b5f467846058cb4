//! HTTP/JSON client for the Canopy category and variant endpoints
//!
//! Implements `canopy_manage::CategoryApi` and `canopy_filter::VariantSource`
//! over a single `reqwest::Client`.

pub mod http;
pub mod wire;

pub use http::{ClientConfig, ClientError, HttpClient};
