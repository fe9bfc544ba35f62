//! Error types for the DB bridge.
//!
//! Three layers, each with its own enum:
//! - [`DbError`]: driver-level failures raised while talking to the database.
//! - [`BridgeError`]: what the HTTP surface reports, with a status code and a
//!   `{"detail": ...}` body.
//! - [`TransportError`]: what the remote tool adapter sees when the bridge is
//!   unreachable or answers with something other than success.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("{message}")]
    Database {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Message suitable for a `detail` field: the driver text, plus the
    /// SQLSTATE when the database reported one.
    pub fn detail(&self) -> String {
        match self {
            Self::Database {
                message,
                sql_state: Some(code),
            } => format!("{} (SQLSTATE: {})", message, code),
            other => other.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => {
                DbError::connection(format!("Invalid connection settings: {}", msg))
            }
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DbError::database(db_err.message(), code)
            }
            sqlx::Error::Io(io_err) => DbError::connection(format!("I/O error: {}", io_err)),
            sqlx::Error::Tls(tls_err) => DbError::connection(format!("TLS error: {}", tls_err)),
            sqlx::Error::Protocol(msg) => DbError::connection(format!("Protocol error: {}", msg)),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::decode(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::decode(source.to_string()),
            sqlx::Error::WorkerCrashed => DbError::internal("Database worker crashed"),
            other => DbError::internal(other.to_string()),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors reported by the bridge's HTTP surface.
///
/// Every variant renders as `{"detail": <message>}` with the status from
/// [`BridgeError::status_code`].
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No usable connection target. Raised before any connection attempt.
    #[error("{message}")]
    Configuration { message: String },

    /// Schema introspection failed after the configuration check passed.
    #[error("{message}")]
    Execution { message: String },

    /// The submitted statement could not be executed.
    #[error("{message}")]
    Query { message: String },

    /// The request body could not be parsed.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl BridgeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    ///
    /// Query failures are attributed to the caller (400); configuration and
    /// introspection failures are the server's (500).
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration { .. } | Self::Execution { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Query { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidRequest { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Short name of the error kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Execution { .. } => "execution",
            Self::Query { .. } => "query",
            Self::InvalidRequest { .. } => "invalid_request",
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(crate::models::ErrorBody {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Failures seen by the remote tool adapter.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("bridge returned HTTP {status}: {}", status_text(.detail, .body))]
    Status {
        status: u16,
        /// `detail` field of a JSON error body, when present
        detail: Option<String>,
        body: String,
    },

    #[error("could not decode bridge response: {message}")]
    Decode { message: String },

    #[error("request failed: {message}")]
    Request { message: String },
}

impl TransportError {
    /// Build a status error from a non-success response body, extracting the
    /// `detail` field when the body is a JSON object carrying one.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let detail = serde_json::from_str::<JsonValue>(&body)
            .ok()
            .and_then(|value| value.get("detail").cloned())
            .map(|detail| match detail {
                JsonValue::String(s) => s,
                other => other.to_string(),
            });
        Self::Status {
            status,
            detail,
            body,
        }
    }

    /// Classify a reqwest failure.
    pub fn from_reqwest(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: error_chain(&err),
            }
        } else if err.is_decode() {
            Self::Decode {
                message: error_chain(&err),
            }
        } else {
            Self::Request {
                message: error_chain(&err),
            }
        }
    }

    /// Best available description of what went wrong, most specific first:
    /// the remote `detail`, then the raw response body, then this error's
    /// own description.
    pub fn detail(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }

    /// Timeouts and refused connections are worth another attempt by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Connect { .. })
    }
}

fn status_text<'a>(detail: &'a Option<String>, body: &'a str) -> &'a str {
    detail.as_deref().unwrap_or(body)
}

/// Join an error with its sources; reqwest keeps the useful part (e.g.
/// "Connection refused") in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
