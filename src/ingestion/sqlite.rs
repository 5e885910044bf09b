//! SQLite ingestion implementation.
//!
//! The database is opened read-only. User tables are discovered from the catalog; at most
//! [`MAX_TABLES`] tables are read, [`MAX_ROWS_PER_TABLE`] rows each, and combined side by side
//! into a single table with `{table}_{column}` column names.

use std::fs;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::error::{IngestError, IngestResult};
use crate::types::{Column, DataTable, Schema, Value};

use super::has_extension;
use super::infer::unify_value_columns;

/// Hard cap on the number of user tables read. Extra tables are silently skipped.
pub const MAX_TABLES: usize = 3;

/// Hard cap on rows read per table (`LIMIT`, no `ORDER BY`).
pub const MAX_ROWS_PER_TABLE: usize = 1_000;

/// Catalog query for user tables. Internal `sqlite_*` tables are excluded by name.
const USER_TABLES_SQL: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";

/// Check a SQLite database file before loading it.
///
/// Fails when the file is missing, lacks a `.db`/`.sqlite`/`.sqlite3` extension, is zero bytes,
/// or contains no user tables.
pub fn validate_sqlite(path: impl AsRef<Path>) -> IngestResult<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IngestError::validation("File does not exist"));
    }
    if !has_extension(path, &["db", "sqlite", "sqlite3"]) {
        return Err(IngestError::validation("File must be a SQLite database"));
    }

    let size = fs::metadata(path)?.len();
    if size == 0 {
        return Err(IngestError::validation("Database file is empty"));
    }

    let conn = open_read_only(path)?;
    let tables = user_tables(&conn)?;
    if tables.is_empty() {
        return Err(IngestError::validation("No tables found in database"));
    }

    Ok(())
}

/// Load a SQLite database into one combined [`DataTable`].
///
/// Tables are taken in catalog order; when more than [`MAX_TABLES`] exist, only the first
/// [`MAX_TABLES`] are read. Per-table tables are concatenated column-wise: shorter tables are
/// padded with nulls up to the longest table's row count, so the combined row count is the
/// maximum individual row count. The returned [`Schema`] lists the table names actually read in
/// `tables_found`.
pub fn load_sqlite(path: impl AsRef<Path>) -> IngestResult<(DataTable, Schema)> {
    let path = path.as_ref();
    let conn = open_read_only(path)?;

    let mut tables = user_tables(&conn)?;
    if tables.is_empty() {
        return Err(IngestError::malformed("No tables found in database"));
    }
    tables.truncate(MAX_TABLES);

    let mut parts = Vec::with_capacity(tables.len());
    for name in &tables {
        parts.push(read_table(&conn, name)?);
    }

    let mut names: Vec<String> = Vec::new();
    for (table_name, part) in tables.iter().zip(parts.iter()) {
        for col in &part.column_names {
            names.push(format!("{table_name}_{col}"));
        }
    }

    // Side-by-side combination: rows align by position, shorter tables pad with nulls.
    let max_rows = parts.iter().map(|p| p.rows.len()).max().unwrap_or(0);
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(max_rows);
    for r in 0..max_rows {
        let mut row = Vec::with_capacity(names.len());
        for part in &parts {
            match part.rows.get(r) {
                Some(cells) => row.extend(cells.iter().cloned()),
                None => row.extend(std::iter::repeat_n(Value::Null, part.column_names.len())),
            }
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
    schema.tables_found = Some(tables.clone());
    schema.note = Some(format!(
        "Data from {} tables, max {MAX_ROWS_PER_TABLE} rows each",
        tables.len()
    ));

    Ok((table, schema))
}

struct TablePart {
    column_names: Vec<String>,
    rows: Vec<Vec<Value>>,
}

fn open_read_only(path: &Path) -> IngestResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

fn user_tables(conn: &Connection) -> IngestResult<Vec<String>> {
    let mut stmt = conn.prepare(USER_TABLES_SQL)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn read_table(conn: &Connection, name: &str) -> IngestResult<TablePart> {
    // Identifier quoting: double any embedded double quote.
    let sql = format!(
        "SELECT * FROM \"{}\" LIMIT {MAX_ROWS_PER_TABLE}",
        name.replace('"', "\"\"")
    );
    let mut stmt = conn.prepare(&sql)?;
    let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = column_names.len();

    let mut out: Vec<Vec<Value>> = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(cell_value(row.get_ref(i)?));
        }
        out.push(cells);
    }

    Ok(TablePart {
        column_names,
        rows: out,
    })
}

fn cell_value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(t) => Value::Utf8(String::from_utf8_lossy(t).into_owned()),
        // Blobs have no flat-schema equivalent; keep a lossy text rendering.
        ValueRef::Blob(b) => Value::Utf8(String::from_utf8_lossy(b).into_owned()),
    }
}
