//! Query-related data models.
//!
//! This module defines the `POST /query` request and response bodies.

use crate::models::Row;
use serde::{Deserialize, Serialize};

/// Acknowledgement returned when a statement produces no result set.
pub const QUERY_SUCCESS_MESSAGE: &str = "Query executed successfully";

/// A parameter value for parameterized queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Bound positionally; count must match the statement's placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<QueryParam>>,
}

impl QueryRequest {
    /// Create a request without parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: None,
        }
    }

    /// Add a parameter to this query.
    pub fn with_param(mut self, param: QueryParam) -> Self {
        self.params.get_or_insert_with(Vec::new).push(param);
        self
    }

    /// Parameters as a slice (empty when none were supplied).
    pub fn params(&self) -> &[QueryParam] {
        self.params.as_deref().unwrap_or(&[])
    }
}

/// What executing a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The statement reported column metadata; rows may still be empty.
    Rows(Vec<Row>),
    /// No column metadata, e.g. INSERT/UPDATE/DDL.
    NoResultSet { rows_affected: u64 },
}

/// Body of a successful `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    pub results: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<QueryOutcome> for QueryResponse {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Rows(results) => Self {
                results,
                message: None,
            },
            QueryOutcome::NoResultSet { .. } => Self {
                results: Vec::new(),
                message: Some(QUERY_SUCCESS_MESSAGE.to_string()),
            },
        }
    }
}
