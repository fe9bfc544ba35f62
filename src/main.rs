//! DB Bridge - Main entry point.
//!
//! Serves `/health`, `/schema` and `/query` over HTTP for the database named
//! by `DB_URL`.

use db_bridge::BridgeServer;
use db_bridge::config::{Config, DatabaseStatus};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    init_tracing(&config);

    info!(
        addr = %config.bind_addr(),
        "Starting DB Bridge v{}",
        env!("CARGO_PKG_VERSION")
    );

    // The bridge still starts without a usable target; /health stays up and
    // the database endpoints report the problem per request.
    match config.database_status() {
        DatabaseStatus::Configured(target) => {
            info!(db_type = %target.db_type(), target = %target.redacted(), "Database configured");
        }
        DatabaseStatus::Missing => {
            warn!("DB_URL is not set; /schema and /query will fail until it is configured");
        }
        DatabaseStatus::Invalid(reason) => {
            warn!(reason = %reason, "DB_URL is invalid; /schema and /query will fail");
        }
    }

    let server = BridgeServer::from_config(&config);
    if let Err(e) = server.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
