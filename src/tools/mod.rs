//! Remote tool adapter.
//!
//! - `remote`: HTTP calls to a running bridge, normalized to text
//! - `registry`: named capabilities with descriptions and input schemas

pub mod registry;
pub mod remote;

pub use registry::{GetSchemaInput, RunQueryInput, ToolHandler, ToolRegistry, ToolSpec};
pub use remote::RemoteDbTools;

use serde::Serialize;
use serde_json::{Value as JsonValue, json};

/// Result of one capability call: text for the model, plus whether it
/// describes a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }

    /// Failure carrying `{"error": message, "retryable": bool}`.
    pub fn error(message: impl Into<String>, retryable: bool) -> Self {
        Self::failure(pretty(&json!({
            "error": message.into(),
            "retryable": retryable,
        })))
    }
}

pub(crate) fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
