//! Schema introspection module.
//!
//! Builds a [`SchemaDescriptor`] for the default namespace of the connected
//! database: one listing query for the tables, then one column query per table.
//!
//! # Architecture
//!
//! SQL queries are organized in the `queries` submodule with constants for each
//! database type. Database-specific implementations are in their respective
//! submodules (postgres, mysql, sqlite), each providing the same interface.

use crate::db::DbConnection;
use crate::error::{DbError, DbResult};
use crate::models::{ColumnDescriptor, SchemaDescriptor};
use tracing::debug;

/// Schema inspector for database introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// Describe every table visible in the default namespace.
    pub async fn describe(conn: &mut DbConnection) -> DbResult<SchemaDescriptor> {
        let schema = match conn {
            DbConnection::Postgres(c) => postgres::describe(c).await?,
            DbConnection::MySql(c) => mysql::describe(c).await?,
            DbConnection::SQLite(c) => sqlite::describe(c).await?,
        };
        debug!(tables = schema.len(), "Described schema");
        Ok(schema)
    }

    /// List table names in the default namespace, in catalog order.
    pub async fn list_tables(conn: &mut DbConnection) -> DbResult<Vec<String>> {
        match conn {
            DbConnection::Postgres(c) => postgres::list_tables(c).await,
            DbConnection::MySql(c) => mysql::list_tables(c).await,
            DbConnection::SQLite(c) => sqlite::list_tables(c).await,
        }
    }

    /// Columns of one table in natural column order. Unknown tables yield an
    /// empty list.
    pub async fn describe_table(
        conn: &mut DbConnection,
        table_name: &str,
    ) -> DbResult<Vec<ColumnDescriptor>> {
        match conn {
            DbConnection::Postgres(c) => postgres::fetch_columns(c, table_name).await,
            DbConnection::MySql(c) => mysql::fetch_columns(c, table_name).await,
            DbConnection::SQLite(c) => sqlite::fetch_columns(c, table_name).await,
        }
    }
}

// =============================================================================
// SQL Query Templates
// =============================================================================
//
// Table listings are not sorted; the response keeps catalog order.

mod queries {
    pub mod postgres {
        pub const LIST_TABLES: &str = r#"
            SELECT table_name::text AS table_name
            FROM information_schema.tables
            WHERE table_schema = 'public'
            "#;

        pub const DESCRIBE_COLUMNS: &str = r#"
            SELECT
                column_name::text AS column_name,
                data_type::text AS data_type,
                is_nullable::text AS is_nullable
            FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1
            ORDER BY ordinal_position
            "#;
    }

    pub mod mysql {
        pub const LIST_TABLES: &str = r#"
            SELECT CONVERT(TABLE_NAME USING utf8mb4) AS table_name
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE()
            "#;

        pub const DESCRIBE_COLUMNS: &str = r#"
            SELECT
                CONVERT(COLUMN_NAME USING utf8mb4) AS column_name,
                CONVERT(DATA_TYPE USING utf8mb4) AS data_type,
                CONVERT(IS_NULLABLE USING utf8mb4) AS is_nullable
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
            "#;
    }

    pub mod sqlite {
        pub const LIST_TABLES: &str = r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table'
            AND name NOT LIKE 'sqlite_%'
            "#;

        pub const DESCRIBE_COLUMNS: &str =
            r#"SELECT name, type, "notnull" FROM pragma_table_info(?) ORDER BY cid"#;
    }
}

/// `information_schema` reports nullability as 'YES' / 'NO'.
fn yes_no(value: &str) -> bool {
    value.eq_ignore_ascii_case("YES")
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

mod postgres {
    use super::*;
    use sqlx::{PgConnection, Row};

    pub async fn describe(conn: &mut PgConnection) -> DbResult<SchemaDescriptor> {
        let tables = list_tables(conn).await?;
        let mut schema = SchemaDescriptor::new();
        for table in tables {
            let columns = fetch_columns(conn, &table).await?;
            schema.insert(table, columns);
        }
        Ok(schema)
    }

    pub async fn list_tables(conn: &mut PgConnection) -> DbResult<Vec<String>> {
        let rows = sqlx::query(queries::postgres::LIST_TABLES)
            .fetch_all(&mut *conn)
            .await?;
        let tables = rows
            .iter()
            .map(|row| row.try_get::<String, _>("table_name"))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = tables.len(), "Listed PostgreSQL tables");
        Ok(tables)
    }

    pub async fn fetch_columns(
        conn: &mut PgConnection,
        table_name: &str,
    ) -> DbResult<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(queries::postgres::DESCRIBE_COLUMNS)
            .bind(table_name)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter()
            .map(|row| -> DbResult<ColumnDescriptor> {
                let name: String = row.try_get("column_name")?;
                let data_type: String = row.try_get("data_type")?;
                let nullable: String = row.try_get("is_nullable")?;
                Ok(ColumnDescriptor::new(name, data_type, yes_no(&nullable)))
            })
            .collect()
    }
}

mod mysql {
    use super::*;
    use sqlx::mysql::MySqlRow;
    use sqlx::{MySqlConnection, Row};

    /// Get a string from a MySQL row.
    ///
    /// Falls back to raw bytes for servers that report catalog columns as
    /// VARBINARY.
    fn get_string(row: &MySqlRow, column: &str) -> DbResult<String> {
        match row.try_get::<String, _>(column) {
            Ok(text) => Ok(text),
            Err(text_err) => match row.try_get::<Vec<u8>, _>(column) {
                Ok(bytes) => catalog_text(column, bytes),
                Err(_) => Err(text_err.into()),
            },
        }
    }

    pub(super) fn catalog_text(column: &str, bytes: Vec<u8>) -> DbResult<String> {
        String::from_utf8(bytes).map_err(|e| {
            DbError::decode(format!("Catalog column {column} is not valid UTF-8: {e}"))
        })
    }

    pub async fn describe(conn: &mut MySqlConnection) -> DbResult<SchemaDescriptor> {
        let tables = list_tables(conn).await?;
        let mut schema = SchemaDescriptor::new();
        for table in tables {
            let columns = fetch_columns(conn, &table).await?;
            schema.insert(table, columns);
        }
        Ok(schema)
    }

    pub async fn list_tables(conn: &mut MySqlConnection) -> DbResult<Vec<String>> {
        let rows = sqlx::query(queries::mysql::LIST_TABLES)
            .fetch_all(&mut *conn)
            .await?;
        let tables = rows
            .iter()
            .map(|row| get_string(row, "table_name"))
            .collect::<DbResult<Vec<String>>>()?;
        debug!(count = tables.len(), "Listed MySQL tables");
        Ok(tables)
    }

    pub async fn fetch_columns(
        conn: &mut MySqlConnection,
        table_name: &str,
    ) -> DbResult<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(queries::mysql::DESCRIBE_COLUMNS)
            .bind(table_name)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter()
            .map(|row| -> DbResult<ColumnDescriptor> {
                Ok(ColumnDescriptor::new(
                    get_string(row, "column_name")?,
                    get_string(row, "data_type")?,
                    yes_no(&get_string(row, "is_nullable")?),
                ))
            })
            .collect()
    }
}

mod sqlite {
    use super::*;
    use sqlx::{Row, SqliteConnection};

    pub async fn describe(conn: &mut SqliteConnection) -> DbResult<SchemaDescriptor> {
        let tables = list_tables(conn).await?;
        let mut schema = SchemaDescriptor::new();
        for table in tables {
            let columns = fetch_columns(conn, &table).await?;
            schema.insert(table, columns);
        }
        Ok(schema)
    }

    pub async fn list_tables(conn: &mut SqliteConnection) -> DbResult<Vec<String>> {
        let rows = sqlx::query(queries::sqlite::LIST_TABLES)
            .fetch_all(&mut *conn)
            .await?;
        let tables = rows
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = tables.len(), "Listed SQLite tables");
        Ok(tables)
    }

    pub async fn fetch_columns(
        conn: &mut SqliteConnection,
        table_name: &str,
    ) -> DbResult<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(queries::sqlite::DESCRIBE_COLUMNS)
            .bind(table_name)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter()
            .map(|row| -> DbResult<ColumnDescriptor> {
                let name: String = row.try_get("name")?;
                // Columns declared without a type report ''
                let data_type: String = row.try_get("type")?;
                let notnull: i64 = row.try_get("notnull")?;
                Ok(ColumnDescriptor::new(name, data_type, notnull == 0))
            })
            .collect()
    }
}
