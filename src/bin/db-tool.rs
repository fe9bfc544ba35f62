//! db-tool - invoke one bridge capability from the command line.
//!
//! ```text
//! db-tool --list
//! db-tool get_schema
//! db-tool run_query --args '{"query": "SELECT 1"}'
//! ```
//!
//! Prints the capability's text output. Exits with status 1 when the output
//! describes a failure.

use clap::Parser;
use db_bridge::config::ToolClientConfig;
use db_bridge::tools::{RemoteDbTools, ToolRegistry};
use serde_json::Value as JsonValue;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = ToolClientConfig::parse();
    init_tracing(&config.log_level);

    let tools = RemoteDbTools::new(&config.bridge_url).with_timeout(config.timeout_duration());
    let registry = ToolRegistry::new(tools);

    if config.list {
        let definitions: Vec<JsonValue> = registry
            .specs()
            .into_iter()
            .map(|spec| spec.definition())
            .collect();
        match serde_json::to_string_pretty(&definitions) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    let Some(capability) = config.capability.as_deref() else {
        eprintln!("Error: a capability name is required (or pass --list)");
        return ExitCode::FAILURE;
    };

    let arguments: JsonValue = match serde_json::from_str(&config.args) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: --args is not valid JSON: {e}");
            return ExitCode::FAILURE;
        }
    };

    debug!(capability, bridge = %config.bridge_url, "Invoking capability");
    let output = registry.call(capability, arguments).await;
    println!("{}", output.content);

    if output.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
