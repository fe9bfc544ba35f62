//! Data models for the DB bridge.
//!
//! This module re-exports all wire types exchanged between the bridge and its
//! clients.

pub mod query;
pub mod schema;
pub mod value;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use query::{QUERY_SUCCESS_MESSAGE, QueryOutcome, QueryParam, QueryRequest, QueryResponse};
pub use schema::{ColumnDescriptor, SchemaDescriptor, SchemaResponse, TableColumns};
pub use value::{Row, ScalarValue};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
