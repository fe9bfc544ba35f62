//! Query execution engine.
//!
//! Runs one statement (or batch) on a scoped connection with positional
//! parameters and a timeout, and reports either the rows it produced or that it
//! produced no result set.
//!
//! Whether a statement has a result set is decided from the driver's column
//! metadata, never from the SQL text: rows returned means a result set; no
//! rows means the statement is described and its columns counted.
//!
//! # Architecture
//!
//! The executor uses database-specific implementations organized in submodules:
//! - `mysql`: MySQL-specific execution
//! - `postgres`: PostgreSQL-specific execution
//! - `sqlite`: SQLite-specific execution
//!
//! Each submodule provides identical functionality adapted to the database's type system.

use crate::config::DEFAULT_QUERY_TIMEOUT_SECS;
use crate::db::DbConnection;
use crate::db::params::{bind_mysql_param, bind_postgres_param, bind_sqlite_param};
use crate::db::types::RowToRecord;
use crate::error::{DbError, DbResult};
use crate::models::{QueryOutcome, QueryParam, QueryRequest};
use futures_util::TryStreamExt;
use sqlx::{Either, Executor, Statement};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// Query executor that handles database query execution.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor {
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(query_timeout: Duration) -> Self {
        Self { query_timeout }
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Execute a request on an open connection.
    pub async fn execute(
        &self,
        conn: &mut DbConnection,
        request: &QueryRequest,
    ) -> DbResult<QueryOutcome> {
        let start = Instant::now();
        let sql = request.query.as_str();
        let params = request.params();

        debug!(
            sql = %sql,
            params = params.len(),
            timeout_secs = self.query_timeout.as_secs(),
            "Executing query"
        );

        let work = async {
            match conn {
                DbConnection::MySql(c) => mysql::run(c, sql, params).await,
                DbConnection::Postgres(c) => postgres::run(c, sql, params).await,
                DbConnection::SQLite(c) => sqlite::run(c, sql, params).await,
            }
        };

        let outcome = match timeout(self.query_timeout, work).await {
            Ok(result) => result?,
            Err(_) => return Err(timeout_error("query execution", self.query_timeout)),
        };

        match &outcome {
            QueryOutcome::Rows(rows) => debug!(
                rows = rows.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Query returned a result set"
            ),
            QueryOutcome::NoResultSet { rows_affected } => debug!(
                rows_affected,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Query completed without a result set"
            ),
        }
        Ok(outcome)
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS))
    }
}

// =============================================================================
// Common Helper Functions
// =============================================================================

/// Separate rows from per-statement summaries, summing affected rows.
fn split_results<Q, R>(
    results: Vec<Either<Q, R>>,
    rows_affected: impl Fn(&Q) -> u64,
) -> (Vec<R>, u64) {
    let mut rows = Vec::new();
    let mut affected = 0u64;
    for item in results {
        match item {
            Either::Left(summary) => affected = affected.saturating_add(rows_affected(&summary)),
            Either::Right(row) => rows.push(row),
        }
    }
    (rows, affected)
}

/// Build the outcome for a run that returned no rows: the statement still
/// has a result set if describing it yields columns.
fn empty_outcome(has_columns: bool, rows_affected: u64) -> QueryOutcome {
    if has_columns {
        QueryOutcome::Rows(Vec::new())
    } else {
        QueryOutcome::NoResultSet { rows_affected }
    }
}

fn describe_failed(err: sqlx::Error) -> bool {
    // Batches and some utility statements cannot be prepared; they have no
    // single result set to report.
    debug!(error = %err, "Could not describe statement, treating as no result set");
    false
}

fn timeout_error(operation: &str, timeout: Duration) -> DbError {
    DbError::timeout(operation, timeout.as_secs())
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================
//
// Each module below provides the same interface adapted to its database type.

mod mysql {
    use super::*;
    use sqlx::MySqlConnection;

    pub async fn run(
        conn: &mut MySqlConnection,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<QueryOutcome> {
        // When params is empty, use raw SQL to avoid prepared statement issues
        let results: Vec<_> = if params.is_empty() {
            Executor::fetch_many(&mut *conn, sql).try_collect().await?
        } else {
            let query = params.iter().fold(sqlx::query(sql), bind_mysql_param);
            Executor::fetch_many(&mut *conn, query).try_collect().await?
        };

        let (rows, affected) = split_results(results, |r| r.rows_affected());
        if !rows.is_empty() {
            return Ok(QueryOutcome::Rows(
                rows.iter().map(RowToRecord::to_record).collect(),
            ));
        }

        let has_columns = match Executor::prepare(&mut *conn, sql).await {
            Ok(statement) => !statement.columns().is_empty(),
            Err(e) => describe_failed(e),
        };
        Ok(empty_outcome(has_columns, affected))
    }
}

mod postgres {
    use super::*;
    use sqlx::PgConnection;

    pub async fn run(
        conn: &mut PgConnection,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<QueryOutcome> {
        let results: Vec<_> = if params.is_empty() {
            Executor::fetch_many(&mut *conn, sql).try_collect().await?
        } else {
            let query = params.iter().fold(sqlx::query(sql), bind_postgres_param);
            Executor::fetch_many(&mut *conn, query).try_collect().await?
        };

        let (rows, affected) = split_results(results, |r| r.rows_affected());
        if !rows.is_empty() {
            return Ok(QueryOutcome::Rows(
                rows.iter().map(RowToRecord::to_record).collect(),
            ));
        }

        let has_columns = match Executor::prepare(&mut *conn, sql).await {
            Ok(statement) => !statement.columns().is_empty(),
            Err(e) => describe_failed(e),
        };
        Ok(empty_outcome(has_columns, affected))
    }
}

mod sqlite {
    use super::*;
    use sqlx::SqliteConnection;

    pub async fn run(
        conn: &mut SqliteConnection,
        sql: &str,
        params: &[QueryParam],
    ) -> DbResult<QueryOutcome> {
        let results: Vec<_> = if params.is_empty() {
            Executor::fetch_many(&mut *conn, sql).try_collect().await?
        } else {
            let query = params.iter().fold(sqlx::query(sql), bind_sqlite_param);
            Executor::fetch_many(&mut *conn, query).try_collect().await?
        };

        let (rows, affected) = split_results(results, |r| r.rows_affected());
        if !rows.is_empty() {
            return Ok(QueryOutcome::Rows(
                rows.iter().map(RowToRecord::to_record).collect(),
            ));
        }

        let has_columns = match Executor::prepare(&mut *conn, sql).await {
            Ok(statement) => !statement.columns().is_empty(),
            Err(e) => describe_failed(e),
        };
        Ok(empty_outcome(has_columns, affected))
    }
}
