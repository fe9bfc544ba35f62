//! HTTP surface of the bridge.
//!
//! Three endpoints on a single axum router:
//! - `GET /health`: liveness, no database access
//! - `GET /schema`: tables and columns of the default namespace
//! - `POST /query`: execute one statement with positional parameters

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{BridgeState, SharedState};

use crate::config::Config;
use std::future::Future;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

/// The bridge HTTP server.
pub struct BridgeServer {
    state: SharedState,
    host: String,
    port: u16,
}

impl BridgeServer {
    /// Create a new server.
    ///
    /// # Arguments
    ///
    /// * `state` - Shared state handed to every handler
    /// * `host` - Host address to bind to
    /// * `port` - Port to bind to
    pub fn new(state: SharedState, host: impl Into<String>, port: u16) -> Self {
        Self {
            state,
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            BridgeState::from_config(config).into_shared(),
            &config.host,
            config.port,
        )
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Bind and serve until SIGINT or SIGTERM.
    pub async fn run(&self) -> std::io::Result<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await.inspect_err(|e| {
            error!(addr = %bind_addr, error = %e, "Failed to bind");
        })?;
        info!(addr = %bind_addr, "Bridge listening");

        self.serve(listener, wait_for_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` completes, then
    /// let in-flight requests finish.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .inspect_err(|e| error!(error = %e, "HTTP server error"))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
pub async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
