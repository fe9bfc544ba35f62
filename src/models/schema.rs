//! Schema-related data models.
//!
//! This module defines the schema descriptor returned by `GET /schema`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One column as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub column_name: String,
    /// Database-native type name (e.g., "integer", "character varying", "TEXT")
    pub data_type: String,
    pub is_nullable: bool,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            is_nullable: nullable,
        }
    }
}

/// A table and its columns in natural column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    pub table_name: String,
    pub columns: Vec<ColumnDescriptor>,
}

/// Tables visible in the default namespace, each mapped to its columns.
///
/// Serialized as a JSON object keyed by table name. Tables keep the order in
/// which the catalog listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDescriptor {
    tables: Vec<TableColumns>,
}

impl SchemaDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. A table name that is already present has its columns replaced.
    pub fn insert(&mut self, table_name: impl Into<String>, columns: Vec<ColumnDescriptor>) {
        let table_name = table_name.into();
        match self.tables.iter_mut().find(|t| t.table_name == table_name) {
            Some(existing) => existing.columns = columns,
            None => self.tables.push(TableColumns {
                table_name,
                columns,
            }),
        }
    }

    /// Columns of a table, if present.
    pub fn table(&self, table_name: &str) -> Option<&[ColumnDescriptor]> {
        self.tables
            .iter()
            .find(|t| t.table_name == table_name)
            .map(|t| t.columns.as_slice())
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.table_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Serialize for SchemaDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.table_name, &table.columns)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaDescriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = SchemaDescriptor;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of table names to column lists")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut schema = SchemaDescriptor::new();
                while let Some((name, columns)) =
                    access.next_entry::<String, Vec<ColumnDescriptor>>()?
                {
                    schema.insert(name, columns);
                }
                Ok(schema)
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

/// Body of a successful `GET /schema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: SchemaDescriptor,
}
