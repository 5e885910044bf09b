//! Core data model types for ingestion.
//!
//! Each format handler produces an in-memory [`DataTable`] plus a flat [`Schema`] descriptor.
//! Column types are inferred from the data, not supplied by the caller.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Logical data type for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Naive datetime (no timezone).
    Datetime,
}

impl DataType {
    /// Flat type-name string used in [`Schema::data_types`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int64 => "integer",
            Self::Float64 => "float",
            Self::Bool => "boolean",
            Self::Utf8 => "string",
            Self::Datetime => "datetime",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed cell in a [`DataTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Naive datetime.
    Datetime(NaiveDateTime),
}

impl Value {
    /// Whether this cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text rendering, used when a mixed column is coerced to strings.
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Int64(v) => v.to_string(),
            Self::Float64(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Utf8(v) => v.clone(),
            Self::Datetime(v) => v.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// A named, typed column in a [`DataTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Inferred data type.
    pub data_type: DataType,
}

impl Column {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as `columns`. Every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    /// Ordered column descriptors.
    pub columns: Vec<Column>,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Create a table from columns and rows.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Keep only the first `max_rows` rows (strict prefix, order preserved).
    pub fn truncate_rows(&mut self, max_rows: usize) {
        if self.rows.len() > max_rows {
            self.rows.truncate(max_rows);
        }
    }
}

/// Flat schema descriptor for an ingested table.
///
/// This is a summary for downstream consumers, not a database schema: column names in source
/// order, counts, and a per-column primitive type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Column names, in source order.
    pub columns: Vec<String>,
    /// Row count of the (possibly truncated) table.
    pub row_count: usize,
    /// Column count.
    pub column_count: usize,
    /// Column name -> type-name string ("integer", "float", "boolean", "string", "datetime").
    pub data_types: BTreeMap<String, String>,
    /// SQLite only: the user tables actually read (at most 3).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables_found: Option<Vec<String>>,
    /// JSON only: base name of the input file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Human-readable note about applied caps, where a handler sets one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Schema {
    /// Describe a table: columns in order, counts, and per-column type names.
    ///
    /// Format-specific extras (`tables_found`, `source_file`, `note`) start out `None`.
    pub fn describe(table: &DataTable) -> Self {
        let columns = table.column_names();
        let data_types = table
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.data_type.name().to_string()))
            .collect();

        Self {
            columns,
            row_count: table.row_count(),
            column_count: table.column_count(),
            data_types,
            tables_found: None,
            source_file: None,
            note: None,
        }
    }
}
