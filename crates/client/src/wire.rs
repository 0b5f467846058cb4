//! Response bodies and error mapping

use canopy_core::Category;
use canopy_filter::VariantSummary;
use canopy_manage::{ApiError, FieldErrors};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Forest as returned by the category endpoints
///
/// Either `{"categories": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TreeResponse {
    Wrapped { categories: Vec<Category> },
    Bare(Vec<Category>),
}

impl TreeResponse {
    pub fn into_roots(self) -> Vec<Category> {
        match self {
            TreeResponse::Wrapped { categories } => categories,
            TreeResponse::Bare(categories) => categories,
        }
    }
}

/// Variant search answer: bare array, `{"variants": [...]}` or `{"data": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VariantResponse {
    Variants { variants: Vec<VariantSummary> },
    Data { data: Vec<VariantSummary> },
    Bare(Vec<VariantSummary>),
}

impl VariantResponse {
    pub fn into_variants(self) -> Vec<VariantSummary> {
        match self {
            VariantResponse::Variants { variants } => variants,
            VariantResponse::Data { data } => data,
            VariantResponse::Bare(variants) => variants,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    fn into_vec(self) -> Vec<String> {
        match self {
            Messages::One(message) => vec![message],
            Messages::Many(messages) => messages,
        }
    }
}

/// Error body: `{"message": "...", "errors": {"field": "msg" | ["msg", ...]}}`
///
/// Each part is read on its own, so a field entry in an unexpected shape is
/// skipped without losing the message or the other fields.
#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let errors = value
            .get("errors")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(field, messages)| {
                        let messages = Messages::deserialize(messages).ok()?;
                        Some((field.clone(), messages.into_vec()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { message, errors }
    }
}

/// Field used when a validation failure carries no per-field messages
pub const GENERAL_FIELD: &str = "base";

/// Map a non-success status and its body to an `ApiError`
pub fn error_from_response(status: u16, body: &str) -> ApiError {
    let parsed = ErrorBody::parse(body);

    let message = parsed
        .message
        .clone()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let raw = body.trim();
            (!raw.is_empty() && !raw.starts_with('{')).then(|| raw.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {}", status));

    match status {
        422 => {
            let mut fields: FieldErrors = parsed.errors.into_iter().collect();
            if fields.is_empty() {
                fields.insert(GENERAL_FIELD.to_string(), vec![message]);
            }
            ApiError::Validation(fields)
        }
        404 => ApiError::NotFound(message),
        _ => ApiError::Rejected { status, message },
    }
}
