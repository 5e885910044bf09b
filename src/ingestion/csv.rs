//! CSV ingestion implementation.
//!
//! Files are parsed as header-first delimited text. Column types are inferred from the data
//! (integer, float, boolean, datetime, string), and loads are capped at [`MAX_CSV_ROWS`] rows.

use std::fs;
use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::{Column, DataTable, Schema};

use super::has_extension;
use super::infer::{infer_text_column, parse_text_cell};

/// Hard cap on the input file size.
pub const MAX_CSV_BYTES: u64 = 100 * 1024 * 1024;

/// Hard cap on loaded rows. Larger files keep only their first rows.
pub const MAX_CSV_ROWS: usize = 10_000;

/// Check a CSV file before loading it.
///
/// Fails when the file is missing, lacks a `.csv` extension, is zero bytes, or exceeds
/// [`MAX_CSV_BYTES`].
pub fn validate_csv(path: impl AsRef<Path>) -> IngestResult<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IngestError::validation("File does not exist"));
    }
    if !has_extension(path, &["csv"]) {
        return Err(IngestError::validation("File must be a CSV"));
    }

    let size = fs::metadata(path)?.len();
    if size == 0 {
        return Err(IngestError::validation("File is empty"));
    }
    if size > MAX_CSV_BYTES {
        return Err(IngestError::validation(format!(
            "File exceeds the {} MiB size cap",
            MAX_CSV_BYTES / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Load a CSV file with the default row cap. See [`load_csv_with_limit`].
pub fn load_csv(path: impl AsRef<Path>) -> IngestResult<(DataTable, Schema)> {
    load_csv_with_limit(path, MAX_CSV_ROWS)
}

/// Load a CSV file into a [`DataTable`], keeping at most the first `max_rows` rows.
///
/// The header row names the columns. The whole file is parsed (malformed delimited text is an
/// error regardless of where it appears), then truncated to the strict prefix of `max_rows` rows.
/// Types are inferred from the truncated data, so the returned [`Schema`] always describes what
/// was actually loaded.
pub fn load_csv_with_limit(
    path: impl AsRef<Path>,
    max_rows: usize,
) -> IngestResult<(DataTable, Schema)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

    let mut records: Vec<csv::StringRecord> = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }
    records.truncate(max_rows);

    let mut columns = Vec::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        let data_type = infer_text_column(records.iter().map(|r| r.get(idx).unwrap_or("")));
        columns.push(Column::new(name, data_type));
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| parse_text_cell(record.get(idx).unwrap_or(""), col.data_type))
                .collect()
        })
        .collect();

    let table = DataTable::new(columns, rows);
    let schema = Schema::describe(&table);
    Ok((table, schema))
}
