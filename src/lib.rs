//! DB Bridge Library
//!
//! An HTTP bridge that lets a tool-calling agent inspect and query a
//! relational database (SQLite, PostgreSQL, MySQL) without holding the
//! database credentials, plus the client-side tool adapter that calls it.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use config::Config;
pub use error::{BridgeError, DbError, TransportError};
pub use server::BridgeServer;
pub use tools::{RemoteDbTools, ToolOutput, ToolRegistry};
