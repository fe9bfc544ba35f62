//! Shared state for the bridge handlers.

use crate::config::{Config, DatabaseStatus, DatabaseTarget};
use crate::db::QueryExecutor;
use crate::error::BridgeError;
use std::sync::Arc;
use std::time::Duration;

/// Immutable per-process state. Handlers receive it through an `Arc`.
#[derive(Debug)]
pub struct BridgeState {
    pub database: DatabaseStatus,
    pub connect_timeout: Duration,
    pub executor: QueryExecutor,
}

pub type SharedState = Arc<BridgeState>;

impl BridgeState {
    pub fn new(database: DatabaseStatus, connect_timeout: Duration, query_timeout: Duration) -> Self {
        Self {
            database,
            connect_timeout,
            executor: QueryExecutor::new(query_timeout),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.database_status(),
            config.connect_timeout_duration(),
            config.query_timeout_duration(),
        )
    }

    /// The configured target, or a configuration error. Checked before any
    /// connection attempt.
    pub fn target(&self) -> Result<&DatabaseTarget, BridgeError> {
        self.database.target().map_err(BridgeError::configuration)
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(self)
    }
}
