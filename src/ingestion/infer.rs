//! Column type inference shared by the format handlers.
//!
//! CSV columns arrive as raw text and get a type decided from every non-empty cell
//! ([`infer_text_column`]). SQLite and JSON columns arrive already typed per cell and get unified
//! to one logical type per column ([`unify_value_columns`]).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{DataType, Value};

/// Datetime layouts tried, in order, for text cells.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Date-only layouts tried after the datetime layouts. Parsed dates get a midnight time.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Decide the logical type of a text column from its non-empty cells.
///
/// Precedence: integer, float, boolean, datetime, string. Empty cells are null and do not vote.
/// A column with no non-empty cells is a string column.
pub(crate) fn infer_text_column<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut saw_any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;
    let mut all_datetime = true;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        saw_any = true;
        all_int = all_int && cell.parse::<i64>().is_ok();
        all_float = all_float && cell.parse::<f64>().is_ok();
        all_bool = all_bool && parse_bool_token(cell).is_some();
        all_datetime = all_datetime && parse_datetime(cell).is_some();

        if !(all_int || all_float || all_bool || all_datetime) {
            return DataType::Utf8;
        }
    }

    if !saw_any {
        return DataType::Utf8;
    }
    if all_int {
        DataType::Int64
    } else if all_float {
        DataType::Float64
    } else if all_bool {
        DataType::Bool
    } else if all_datetime {
        DataType::Datetime
    } else {
        DataType::Utf8
    }
}

/// Parse one text cell according to the column's decided type. Empty cells become null.
///
/// Inference guarantees the parse succeeds for non-string columns; a cell that still fails falls
/// back to its raw text.
pub(crate) fn parse_text_cell(raw: &str, data_type: DataType) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    match data_type {
        DataType::Utf8 => Value::Utf8(trimmed.to_owned()),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .unwrap_or_else(|_| Value::Utf8(trimmed.to_owned())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .unwrap_or_else(|_| Value::Utf8(trimmed.to_owned())),
        DataType::Bool => parse_bool_token(trimmed)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::Utf8(trimmed.to_owned())),
        DataType::Datetime => parse_datetime(trimmed)
            .map(Value::Datetime)
            .unwrap_or_else(|| Value::Utf8(trimmed.to_owned())),
    }
}

/// Best-effort datetime parse over the supported layouts.
pub(crate) fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_bool_token(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Unify each column of already-typed rows to one logical type, coercing cells in place.
///
/// Rules per column (nulls never vote):
///
/// - a single value variant keeps its type
/// - integers mixed with floats become a float column (integers widened)
/// - any other mix becomes a string column (every cell rendered to text)
/// - an all-null column is a string column
///
/// Returns the decided type for each of the `column_count` columns.
pub(crate) fn unify_value_columns(rows: &mut [Vec<Value>], column_count: usize) -> Vec<DataType> {
    let mut types = Vec::with_capacity(column_count);

    for col in 0..column_count {
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;
        let mut has_utf8 = false;
        let mut has_datetime = false;

        for row in rows.iter() {
            match &row[col] {
                Value::Null => {}
                Value::Int64(_) => has_int = true,
                Value::Float64(_) => has_float = true,
                Value::Bool(_) => has_bool = true,
                Value::Utf8(_) => has_utf8 = true,
                Value::Datetime(_) => has_datetime = true,
            }
        }

        let numeric_only = (has_int || has_float) && !has_bool && !has_utf8 && !has_datetime;
        let decided = if !(has_int || has_float || has_bool || has_utf8 || has_datetime) {
            DataType::Utf8
        } else if numeric_only && !has_float {
            DataType::Int64
        } else if numeric_only {
            DataType::Float64
        } else if has_bool && !has_int && !has_float && !has_utf8 && !has_datetime {
            DataType::Bool
        } else if has_utf8 && !has_int && !has_float && !has_bool && !has_datetime {
            DataType::Utf8
        } else if has_datetime && !has_int && !has_float && !has_bool && !has_utf8 {
            DataType::Datetime
        } else {
            DataType::Utf8
        };

        if decided == DataType::Float64 && has_int {
            for row in rows.iter_mut() {
                if let Value::Int64(v) = row[col] {
                    row[col] = Value::Float64(v as f64);
                }
            }
        } else if decided == DataType::Utf8 && (has_int || has_float || has_bool || has_datetime) {
            for row in rows.iter_mut() {
                if !row[col].is_null() && !matches!(row[col], Value::Utf8(_)) {
                    row[col] = Value::Utf8(row[col].render());
                }
            }
        }

        types.push(decided);
    }

    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_inference_precedence() {
        assert_eq!(infer_text_column(["1", "2", "3"].into_iter()), DataType::Int64);
        assert_eq!(infer_text_column(["1", "2.5"].into_iter()), DataType::Float64);
        assert_eq!(infer_text_column(["true", "no"].into_iter()), DataType::Bool);
        assert_eq!(
            infer_text_column(["2024-01-15", "2024-02-01"].into_iter()),
            DataType::Datetime
        );
        assert_eq!(infer_text_column(["1", "x"].into_iter()), DataType::Utf8);
        assert_eq!(infer_text_column(["", ""].into_iter()), DataType::Utf8);
    }

    #[test]
    fn empty_cells_do_not_vote() {
        assert_eq!(infer_text_column(["1", "", "3"].into_iter()), DataType::Int64);
        assert_eq!(parse_text_cell("", DataType::Int64), Value::Null);
    }

    #[test]
    fn unify_widens_ints_to_float() {
        let mut rows = vec![
            vec![Value::Int64(1)],
            vec![Value::Float64(2.5)],
            vec![Value::Null],
        ];
        let types = unify_value_columns(&mut rows, 1);
        assert_eq!(types, vec![DataType::Float64]);
        assert_eq!(rows[0][0], Value::Float64(1.0));
        assert_eq!(rows[2][0], Value::Null);
    }

    #[test]
    fn unify_coerces_mixed_to_strings() {
        let mut rows = vec![
            vec![Value::Int64(7)],
            vec![Value::Utf8("x".to_string())],
            vec![Value::Bool(true)],
        ];
        let types = unify_value_columns(&mut rows, 1);
        assert_eq!(types, vec![DataType::Utf8]);
        assert_eq!(rows[0][0], Value::Utf8("7".to_string()));
        assert_eq!(rows[2][0], Value::Utf8("true".to_string()));
    }
}
