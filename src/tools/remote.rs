//! HTTP client side of the bridge: the two capabilities an agent calls.
//!
//! Neither capability returns an error to its caller. Failures are folded into
//! a `{"error": "...", "retryable": bool}` payload with `is_error` set, so the
//! text can be handed back to the model as-is. Only timeouts and refused
//! connections are marked retryable.

use crate::config::DEFAULT_TOOL_TIMEOUT_SECS;
use crate::error::TransportError;
use crate::tools::{ToolOutput, pretty};
use reqwest::{Client, RequestBuilder};
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for a running bridge.
#[derive(Debug, Clone)]
pub struct RemoteDbTools {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RemoteDbTools {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }

    /// Per-request timeout. Applies to connecting and reading the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `GET /schema`, pretty-printed.
    pub async fn get_schema(&self) -> ToolOutput {
        let url = self.endpoint("schema");
        match self.send(self.client.get(&url), &url).await {
            Ok(body) => ToolOutput::success(pretty(&body)),
            Err(e) => {
                warn!(url = %url, error = %e, "Schema fetch failed");
                ToolOutput::error(
                    format!("Error fetching schema: {}", e.detail()),
                    e.is_retryable(),
                )
            }
        }
    }

    /// `POST /query` with the statement alone. Returns the `results` array
    /// when present, otherwise the whole response body.
    pub async fn run_query(&self, query: &str) -> ToolOutput {
        let url = self.endpoint("query");
        let request = self.client.post(&url).json(&json!({ "query": query }));
        match self.send(request, &url).await {
            Ok(body) => {
                let content = match body.get("results") {
                    Some(results) => pretty(results),
                    None => pretty(&body),
                };
                ToolOutput::success(content)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Query failed");
                ToolOutput::error(
                    format!("Error executing query: {}", e.detail()),
                    e.is_retryable(),
                )
            }
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<JsonValue, TransportError> {
        let timeout_secs = self.timeout.as_secs();
        debug!(url = %url, "Calling bridge");

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, url, timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::from_reqwest(e, url, timeout_secs))?;
            return Err(TransportError::status(status.as_u16(), body));
        }

        response
            .json::<JsonValue>()
            .await
            .map_err(|e| TransportError::from_reqwest(e, url, timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let tools = RemoteDbTools::new("http://localhost:10001//");
        assert_eq!(tools.base_url(), "http://localhost:10001");
        assert_eq!(tools.endpoint("schema"), "http://localhost:10001/schema");
    }

    #[test]
    fn test_default_timeout() {
        let tools = RemoteDbTools::new("http://localhost:10001");
        assert_eq!(tools.timeout(), Duration::from_secs(10));

        let tools = tools.with_timeout(Duration::from_millis(250));
        assert_eq!(tools.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_error_output_shape() {
        let out = ToolOutput::error("Error executing query: no such table: t", false);
        assert!(out.is_error);
        assert!(out.content.starts_with("{\n  \"error\""), "{}", out.content);
        let parsed: JsonValue = serde_json::from_str(&out.content).unwrap();
        assert_eq!(
            parsed,
            json!({ "error": "Error executing query: no such table: t", "retryable": false })
        );
    }

    #[tokio::test]
    async fn test_refused_connection_is_error_payload() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let tools = RemoteDbTools::new(format!("http://127.0.0.1:{port}"))
            .with_timeout(Duration::from_secs(2));
        let out = tools.run_query("SELECT 1").await;
        assert!(out.is_error);
        let parsed: JsonValue = serde_json::from_str(&out.content).unwrap();
        assert!(
            parsed["error"]
                .as_str()
                .unwrap()
                .starts_with("Error executing query: ")
        );
        assert_eq!(parsed["retryable"], true);

        let out = tools.get_schema().await;
        assert!(out.is_error);
        assert!(out.content.contains("Error fetching schema: "));
        assert!(out.content.contains("\n"));
    }
}
