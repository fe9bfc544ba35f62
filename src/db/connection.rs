//! Scoped database connections.
//!
//! The bridge never pools: every request opens one connection, uses it, and
//! closes it before the response goes out.

use crate::config::{DatabaseTarget, DatabaseType};
use crate::error::{DbError, DbResult};
use futures_util::future::BoxFuture;
use sqlx::{Connection, MySqlConnection, PgConnection, SqliteConnection};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// A single open connection to one of the supported backends.
#[derive(Debug)]
pub enum DbConnection {
    MySql(MySqlConnection),
    Postgres(PgConnection),
    SQLite(SqliteConnection),
}

impl DbConnection {
    /// Open a connection, bounded by `connect_timeout`.
    pub async fn open(target: &DatabaseTarget, connect_timeout: Duration) -> DbResult<Self> {
        let url = target.connection_string();
        let connect = async {
            let conn = match target.db_type() {
                DatabaseType::MySql => Self::MySql(MySqlConnection::connect(url).await?),
                DatabaseType::Postgres => Self::Postgres(PgConnection::connect(url).await?),
                DatabaseType::Sqlite => Self::SQLite(SqliteConnection::connect(url).await?),
            };
            Ok::<_, sqlx::Error>(conn)
        };

        match timeout(connect_timeout, connect).await {
            Ok(Ok(conn)) => {
                debug!(db_type = %target.db_type(), "Opened database connection");
                Ok(conn)
            }
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(DbError::timeout("connect", connect_timeout.as_secs())),
        }
    }

    pub fn db_type(&self) -> DatabaseType {
        match self {
            Self::MySql(_) => DatabaseType::MySql,
            Self::Postgres(_) => DatabaseType::Postgres,
            Self::SQLite(_) => DatabaseType::Sqlite,
        }
    }

    /// Close the connection gracefully. Failures are only logged.
    pub async fn close(self) {
        let result = match self {
            Self::MySql(c) => c.close().await,
            Self::Postgres(c) => c.close().await,
            Self::SQLite(c) => c.close().await,
        };
        if let Err(e) = result {
            debug!(error = %e, "Error while closing database connection");
        }
    }
}

/// Run `f` on a freshly opened connection and close it afterwards, whether
/// `f` succeeded or not.
///
/// ```ignore
/// let schema = with_connection(&target, connect_timeout, |conn| {
///     Box::pin(async move { SchemaInspector::describe(conn).await })
/// })
/// .await?;
/// ```
pub async fn with_connection<T, F>(
    target: &DatabaseTarget,
    connect_timeout: Duration,
    f: F,
) -> DbResult<T>
where
    F: for<'c> FnOnce(&'c mut DbConnection) -> BoxFuture<'c, DbResult<T>>,
{
    let mut conn = DbConnection::open(target, connect_timeout).await?;
    let result = f(&mut conn).await;

    if timeout(connect_timeout, conn.close()).await.is_err() {
        debug!("Timed out closing database connection, dropping it");
    }
    result
}
