//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Scoped, per-request connections
//! - Query execution
//! - Schema introspection
//! - Type mappings
//! - Advisory statement inspection

pub mod connection;
pub mod executor;
pub mod params;
pub mod pg_text;
pub mod schema;
pub mod statement;
pub mod types;

pub use crate::config::DatabaseType;
pub use connection::{DbConnection, with_connection};
pub use executor::QueryExecutor;
pub use schema::SchemaInspector;
pub use statement::StatementKind;
