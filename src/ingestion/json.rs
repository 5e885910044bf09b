//! JSON ingestion implementation.
//!
//! The whole file is parsed as one JSON value. A single object becomes a one-row table; an array
//! of objects becomes one row per element, capped at [`MAX_DOCUMENTS`]. Columns are the union of
//! all object keys in first-seen order; keys absent from a row read as null.

use std::fs;
use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::{Column, DataTable, Schema, Value};

use super::has_extension;
use super::infer::unify_value_columns;

/// Hard cap on loaded top-level documents. Longer arrays keep only their first elements.
pub const MAX_DOCUMENTS: usize = 1_000;

/// Check a JSON file before loading it.
///
/// Fails when the file is missing, lacks a `.json`/`.jsonl` extension, is zero bytes, does not
/// parse as JSON, or parses to something other than an object or array.
pub fn validate_json(path: impl AsRef<Path>) -> IngestResult<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IngestError::validation("File does not exist"));
    }
    if !has_extension(path, &["json", "jsonl"]) {
        return Err(IngestError::validation("File must be a JSON file"));
    }

    let size = fs::metadata(path)?.len();
    if size == 0 {
        return Err(IngestError::validation("File is empty"));
    }

    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| IngestError::validation(format!("File is not valid JSON: {e}")))?;

    if !value.is_object() && !value.is_array() {
        return Err(IngestError::validation(
            "JSON file must contain an object or array",
        ));
    }

    Ok(())
}

/// Load a JSON file into a [`DataTable`].
///
/// A nested object or array value makes its whole column textual: every cell in that column is
/// serialized to its JSON representation rather than flattened. Scalar columns unify to one
/// logical type per column.
pub fn load_json(path: impl AsRef<Path>) -> IngestResult<(DataTable, Schema)> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;

    let mut docs = match value {
        v @ serde_json::Value::Object(_) => vec![v],
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(IngestError::malformed(
                "JSON file must contain an object or array",
            ));
        }
    };
    docs.truncate(MAX_DOCUMENTS);

    // Union of keys across all documents, in first-seen order.
    let mut names: Vec<String> = Vec::new();
    for (idx0, doc) in docs.iter().enumerate() {
        let obj = doc.as_object().ok_or_else(|| {
            IngestError::malformed(format!("document {} is not a JSON object", idx0 + 1))
        })?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    // A column whose first non-null value is an object or array is kept as JSON text throughout.
    let complex: Vec<bool> = names
        .iter()
        .map(|name| {
            docs.iter()
                .filter_map(|doc| doc.get(name))
                .find(|v| !v.is_null())
                .is_some_and(|v| v.is_object() || v.is_array())
        })
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(docs.len());
    for doc in &docs {
        let mut row = Vec::with_capacity(names.len());
        for (name, &as_text) in names.iter().zip(complex.iter()) {
            let cell = match doc.get(name) {
                None | Some(serde_json::Value::Null) => Value::Null,
                Some(v) if as_text => Value::Utf8(json_text(v)),
                Some(v) => scalar_value(v),
            };
            row.push(cell);
        }
        rows.push(row);
    }

    let types = unify_value_columns(&mut rows, names.len());
    let columns = names
        .into_iter()
        .zip(types)
        .map(|(name, data_type)| Column::new(name, data_type))
        .collect();

    let table = DataTable::new(columns, rows);
    let mut schema = Schema::describe(&table);
    schema.source_file = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_owned);
    schema.note = Some(format!(
        "JSON data processed as documents, max {MAX_DOCUMENTS} rows"
    ));

    Ok((table, schema))
}

/// Textual rendering for cells of a column marked as JSON text. Strings keep their content;
/// everything else serializes to compact JSON.
fn json_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scalar_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int64(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float64(f)
            } else {
                Value::Utf8(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        // A nested value whose column was not marked textual (its first non-null was a scalar).
        // Keep it as JSON text; column unification will settle the column on strings.
        other => Value::Utf8(other.to_string()),
    }
}
