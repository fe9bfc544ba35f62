//! Database-agnostic type mappings.
//!
//! This module maps database-specific column values onto [`ScalarValue`].
//!
//! # Architecture
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. Database-specific decoders handle the actual value extraction
//!
//! Values with no scalar counterpart (decimal, uuid, date/time, json, arrays)
//! are rendered as text. On PostgreSQL anything sqlx has no type for is
//! rendered from the raw value (see [`super::pg_text`]); only bytes with no
//! known rendering stay binary. A value that cannot be read at all becomes
//! null and is logged at debug level.

use crate::config::DatabaseType;
use crate::models::{Row as Record, ScalarValue};
use sqlx::mysql::MySqlRow;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::debug;

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Text,
    Binary,
    Json,
    Uuid,
    Temporal,
    Array,
    Null,
    Unknown,
}

/// Classify a database type name into a logical category.
pub fn categorize_type(type_name: &str, db: DatabaseType) -> TypeCategory {
    let lower = type_name.to_lowercase();
    let base = lower.trim_end_matches(" unsigned");

    // PostgreSQL arrays (`INT4[]`, `TEXT[]`)
    if base.ends_with("[]") {
        return TypeCategory::Array;
    }

    match base {
        "null" => return TypeCategory::Null,
        "bool" | "boolean" => return TypeCategory::Boolean,
        "json" | "jsonb" => return TypeCategory::Json,
        "uuid" => return TypeCategory::Uuid,
        "date" | "time" | "datetime" | "timestamp" | "timestamptz" => {
            return TypeCategory::Temporal;
        }
        "year" => return TypeCategory::Integer,
        // Contain "int" but are not integers
        "interval" | "point" | "int4range" | "int8range" => return TypeCategory::Unknown,
        _ => {}
    }

    // Decimal/Numeric - check first as it overlaps with "numeric" in float checks
    if base.contains("decimal") || base.contains("numeric") {
        // SQLite's NUMERIC is actually a float
        if db == DatabaseType::Sqlite && base == "numeric" {
            return TypeCategory::Float;
        }
        return TypeCategory::Decimal;
    }

    if base.contains("int") || base.contains("serial") {
        return TypeCategory::Integer;
    }

    if base.contains("float") || base.contains("double") || base == "real" {
        return TypeCategory::Float;
    }

    if base.contains("blob") || base.contains("binary") || base == "bytea" {
        return TypeCategory::Binary;
    }

    if base.contains("char")
        || base.contains("text")
        || base.contains("clob")
        || matches!(base, "name" | "enum" | "set" | "citext")
    {
        return TypeCategory::Text;
    }

    TypeCategory::Unknown
}

fn undecodable(column: &str, type_name: &str, err: impl std::fmt::Display) -> ScalarValue {
    debug!(column, type_name, error = %err, "Value could not be decoded, returning null");
    ScalarValue::Null
}

/// Bytes that are valid UTF-8 become text, anything else stays binary.
fn text_or_bytes(bytes: Vec<u8>) -> ScalarValue {
    match String::from_utf8(bytes) {
        Ok(s) => ScalarValue::Text(s),
        Err(e) => ScalarValue::Bytes(e.into_bytes()),
    }
}

fn unsigned_to_scalar(v: u64) -> ScalarValue {
    i64::try_from(v)
        .map(ScalarValue::Int)
        .unwrap_or_else(|_| ScalarValue::Text(v.to_string()))
}

// =============================================================================
// Row to Record Trait
// =============================================================================

/// Convert a driver row into a [`Record`], keeping projection order.
pub trait RowToRecord {
    fn to_record(&self) -> Record;
}

impl RowToRecord for MySqlRow {
    fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(self.columns().len());
        for (idx, col) in self.columns().iter().enumerate() {
            let type_name = col.type_info().name();
            let category = categorize_type(type_name, DatabaseType::MySql);
            let value = mysql::decode_column(self, idx, col.name(), type_name, category);
            record.insert(col.name(), value);
        }
        record
    }
}

impl RowToRecord for PgRow {
    fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(self.columns().len());
        for (idx, col) in self.columns().iter().enumerate() {
            let type_name = col.type_info().name();
            let category = categorize_type(type_name, DatabaseType::Postgres);
            let value = postgres::decode_column(self, idx, col.name(), type_name, category);
            record.insert(col.name(), value);
        }
        record
    }
}

impl RowToRecord for SqliteRow {
    fn to_record(&self) -> Record {
        let mut record = Record::with_capacity(self.columns().len());
        for (idx, col) in self.columns().iter().enumerate() {
            let declared = col.type_info().name();
            let value = sqlite::decode_column(self, idx, col.name(), declared);
            record.insert(col.name(), value);
        }
        record
    }
}

// =============================================================================
// Database-Specific Decoders
// =============================================================================

mod mysql {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    pub fn decode_column(
        row: &MySqlRow,
        idx: usize,
        column: &str,
        type_name: &str,
        category: TypeCategory,
    ) -> ScalarValue {
        match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return ScalarValue::Null,
            Ok(_) => {}
            Err(e) => return undecodable(column, type_name, e),
        }

        match category {
            TypeCategory::Null => ScalarValue::Null,
            TypeCategory::Integer => decode_integer(row, idx, column, type_name),
            TypeCategory::Boolean => match row.try_get::<bool, _>(idx) {
                Ok(v) => ScalarValue::Bool(v),
                Err(_) => decode_integer(row, idx, column, type_name),
            },
            TypeCategory::Float => decode_float(row, idx, column, type_name),
            // Sent as text in both protocols, with the declared scale
            TypeCategory::Decimal => decode_text(row, idx, column, type_name),
            TypeCategory::Binary => match row.try_get::<Vec<u8>, _>(idx) {
                Ok(v) => ScalarValue::Bytes(v),
                Err(e) => undecodable(column, type_name, e),
            },
            TypeCategory::Json => match row.try_get::<serde_json::Value, _>(idx) {
                Ok(v) => ScalarValue::Text(v.to_string()),
                Err(_) => decode_text(row, idx, column, type_name),
            },
            TypeCategory::Temporal => decode_temporal(row, idx, column, type_name),
            _ => decode_text(row, idx, column, type_name),
        }
    }

    fn decode_integer(row: &MySqlRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return ScalarValue::Int(v);
        }
        match row.try_get::<u64, _>(idx) {
            Ok(v) => unsigned_to_scalar(v),
            Err(_) => decode_text(row, idx, column, type_name),
        }
    }

    fn decode_float(row: &MySqlRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return ScalarValue::Float(v);
        }
        match row.try_get::<f32, _>(idx) {
            Ok(v) => ScalarValue::Float(f64::from(v)),
            Err(e) => undecodable(column, type_name, e),
        }
    }

    fn decode_temporal(row: &MySqlRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<DateTime<Utc>, _>(idx) {
            return ScalarValue::Text(v.to_rfc3339());
        }
        if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
            return ScalarValue::Text(v.to_string());
        }
        if let Ok(v) = row.try_get::<NaiveDate, _>(idx) {
            return ScalarValue::Text(v.to_string());
        }
        if let Ok(v) = row.try_get::<NaiveTime, _>(idx) {
            return ScalarValue::Text(v.to_string());
        }
        // Zero dates and negative TIME values have no chrono form
        decode_text(row, idx, column, type_name)
    }

    /// MySQL reports some text columns (binary collations, SHOW output) as
    /// VARBINARY, so fall back to raw bytes.
    fn decode_text(row: &MySqlRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<String, _>(idx) {
            return ScalarValue::Text(v);
        }
        match row.try_get_unchecked::<Vec<u8>, _>(idx) {
            Ok(bytes) => text_or_bytes(bytes),
            Err(e) => undecodable(column, type_name, e),
        }
    }
}

mod postgres {
    use super::*;
    use crate::db::pg_text;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use sqlx::postgres::PgValueFormat;

    pub fn decode_column(
        row: &PgRow,
        idx: usize,
        column: &str,
        type_name: &str,
        category: TypeCategory,
    ) -> ScalarValue {
        match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return ScalarValue::Null,
            Ok(_) => {}
            Err(e) => return undecodable(column, type_name, e),
        }

        match category {
            TypeCategory::Null => ScalarValue::Null,
            TypeCategory::Integer => decode_integer(row, idx, column, type_name),
            TypeCategory::Boolean => match row.try_get::<bool, _>(idx) {
                Ok(v) => ScalarValue::Bool(v),
                Err(_) => decode_raw(row, idx, column, type_name),
            },
            TypeCategory::Float => decode_float(row, idx, column, type_name),
            TypeCategory::Binary => match row.try_get::<Vec<u8>, _>(idx) {
                Ok(v) => ScalarValue::Bytes(v),
                Err(_) => decode_raw(row, idx, column, type_name),
            },
            TypeCategory::Json => match row.try_get::<serde_json::Value, _>(idx) {
                Ok(v) => ScalarValue::Text(v.to_string()),
                Err(_) => decode_raw(row, idx, column, type_name),
            },
            TypeCategory::Uuid => match row.try_get::<uuid::Uuid, _>(idx) {
                Ok(v) => ScalarValue::Text(v.to_string()),
                Err(_) => decode_raw(row, idx, column, type_name),
            },
            TypeCategory::Temporal => decode_temporal(row, idx, column, type_name),
            TypeCategory::Text => match row.try_get::<String, _>(idx) {
                Ok(v) => ScalarValue::Text(v),
                Err(_) => decode_raw(row, idx, column, type_name),
            },
            TypeCategory::Decimal | TypeCategory::Array | TypeCategory::Unknown => {
                decode_raw(row, idx, column, type_name)
            }
        }
    }

    fn decode_integer(row: &PgRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<i16, _>(idx) {
            return ScalarValue::Int(i64::from(v));
        }
        if let Ok(v) = row.try_get::<i32, _>(idx) {
            return ScalarValue::Int(i64::from(v));
        }
        match row.try_get::<i64, _>(idx) {
            Ok(v) => ScalarValue::Int(v),
            Err(_) => decode_raw(row, idx, column, type_name),
        }
    }

    fn decode_float(row: &PgRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<f64, _>(idx) {
            return ScalarValue::Float(v);
        }
        match row.try_get::<f32, _>(idx) {
            Ok(v) => ScalarValue::Float(f64::from(v)),
            Err(_) => decode_raw(row, idx, column, type_name),
        }
    }

    fn decode_temporal(row: &PgRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        if let Ok(v) = row.try_get::<DateTime<Utc>, _>(idx) {
            return ScalarValue::Text(v.to_rfc3339());
        }
        if let Ok(v) = row.try_get::<NaiveDateTime, _>(idx) {
            return ScalarValue::Text(v.to_string());
        }
        if let Ok(v) = row.try_get::<NaiveDate, _>(idx) {
            return ScalarValue::Text(v.to_string());
        }
        match row.try_get::<NaiveTime, _>(idx) {
            Ok(v) => ScalarValue::Text(v.to_string()),
            // infinity and BC values
            Err(_) => decode_raw(row, idx, column, type_name),
        }
    }

    /// Text-format values are already the server's rendering; binary ones
    /// are rendered to match so a statement reads the same with or without
    /// parameters.
    fn decode_raw(row: &PgRow, idx: usize, column: &str, type_name: &str) -> ScalarValue {
        let raw = match row.try_get_raw(idx) {
            Ok(raw) => raw,
            Err(e) => return undecodable(column, type_name, e),
        };

        match raw.format() {
            PgValueFormat::Text => match raw.as_str() {
                Ok(text) => ScalarValue::Text(text.to_string()),
                Err(e) => undecodable(column, type_name, e),
            },
            PgValueFormat::Binary => match raw.as_bytes() {
                Ok(bytes) => match pg_text::render(type_name, bytes) {
                    Some(text) => ScalarValue::Text(text),
                    None => {
                        debug!(column, type_name, "No text form for binary value, returning bytes");
                        ScalarValue::Bytes(bytes.to_vec())
                    }
                },
                Err(e) => undecodable(column, type_name, e),
            },
        }
    }
}

mod sqlite {
    use super::*;

    /// SQLite typing is per value, so decode by the value's storage class and
    /// use the declared column type only to recover booleans.
    pub fn decode_column(row: &SqliteRow, idx: usize, column: &str, declared: &str) -> ScalarValue {
        let storage = match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return ScalarValue::Null,
            Ok(raw) => raw.type_info().name().to_string(),
            Err(e) => return undecodable(column, declared, e),
        };

        match storage.as_str() {
            "INTEGER" => match row.try_get::<i64, _>(idx) {
                Ok(v) if categorize_type(declared, DatabaseType::Sqlite) == TypeCategory::Boolean => {
                    ScalarValue::Bool(v != 0)
                }
                Ok(v) => ScalarValue::Int(v),
                Err(e) => undecodable(column, declared, e),
            },
            "REAL" => match row.try_get::<f64, _>(idx) {
                Ok(v) => ScalarValue::Float(v),
                Err(e) => undecodable(column, declared, e),
            },
            "BLOB" => match row.try_get::<Vec<u8>, _>(idx) {
                Ok(v) => ScalarValue::Bytes(v),
                Err(e) => undecodable(column, declared, e),
            },
            _ => match row.try_get_unchecked::<String, _>(idx) {
                Ok(v) => ScalarValue::Text(v),
                Err(e) => undecodable(column, declared, e),
            },
        }
    }
}
