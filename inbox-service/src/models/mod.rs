//! Request/response DTOs and normalization of upstream JSON.

pub mod analysis;
pub mod rewrite;

pub use analysis::{AnalysisRequest, AnalysisResult, Classification};
pub use rewrite::{ReplyStyle, RewriteRequest, RewriteResult};

use serde_json::{Map, Value};

/// Read a string field, falling back to `default` when the field is absent
/// or not a string.
pub(crate) fn string_field(object: &Map<String, Value>, key: &str, default: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
