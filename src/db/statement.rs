//! Advisory statement inspection.
//!
//! Classifies SQL before execution so that mutating statements show up in the
//! logs. Nothing here blocks execution: the bridge runs whatever it is given,
//! and read-only enforcement belongs to the database role it connects with.

use crate::config::DatabaseType;
use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use tracing::{debug, warn};

/// Coarse classification of a SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Every statement is a query, SHOW, or EXPLAIN of a query
    ReadOnly,
    /// At least one statement may change data, schema, or session state
    Mutating,
    /// The text did not parse, or was empty
    Unrecognized,
}

/// Get the appropriate SQL dialect for the given database type.
fn get_dialect(db_type: DatabaseType) -> Box<dyn Dialect> {
    match db_type {
        DatabaseType::Postgres => Box::new(PostgreSqlDialect {}),
        DatabaseType::MySql => Box::new(MySqlDialect {}),
        DatabaseType::Sqlite => Box::new(SQLiteDialect {}),
    }
}

/// Classify `sql` using the dialect of `db_type`.
pub fn classify(sql: &str, db_type: DatabaseType) -> StatementKind {
    let dialect = get_dialect(db_type);
    let statements = match Parser::parse_sql(dialect.as_ref(), sql) {
        Ok(statements) => statements,
        Err(_) => return StatementKind::Unrecognized,
    };

    if statements.is_empty() {
        return StatementKind::Unrecognized;
    }

    if statements.iter().all(is_read_only) {
        StatementKind::ReadOnly
    } else {
        StatementKind::Mutating
    }
}

fn is_read_only(stmt: &Statement) -> bool {
    match stmt {
        Statement::Query(_) => true,
        Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowCreate { .. }
        | Statement::ShowVariable { .. }
        | Statement::ExplainTable { .. } => true,
        Statement::Explain { statement, .. } => is_read_only(statement),
        _ => false,
    }
}

/// Classify and log. Always returns, never rejects.
pub fn inspect(sql: &str, db_type: DatabaseType) -> StatementKind {
    let kind = classify(sql, db_type);
    match kind {
        StatementKind::Mutating => {
            warn!(sql = %preview(sql), "Executing a statement that may modify the database")
        }
        StatementKind::Unrecognized => {
            debug!(sql = %preview(sql), "Statement not recognized by the SQL parser")
        }
        StatementKind::ReadOnly => {}
    }
    kind
}

/// First 200 characters of the statement, on one line.
fn preview(sql: &str) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}
