use std::fs;
use std::io::Write;

use session_ingest::ingestion::json::{MAX_DOCUMENTS, load_json, validate_json};
use session_ingest::types::Value;

#[test]
fn load_json_array_of_objects() {
    let (table, schema) = load_json("tests/fixtures/people.json").unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(schema.columns, vec!["id", "name", "score", "active"]);
    assert_eq!(schema.data_types["id"], "integer");
    assert_eq!(schema.data_types["name"], "string");
    assert_eq!(schema.data_types["score"], "float");
    assert_eq!(schema.data_types["active"], "boolean");
    assert_eq!(schema.source_file.as_deref(), Some("people.json"));
    assert_eq!(
        schema.note.as_deref(),
        Some("JSON data processed as documents, max 1000 rows")
    );
}

#[test]
fn load_json_wraps_single_object_into_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("single.json");
    fs::write(&path, r#"{"id": 7, "name": "solo"}"#).unwrap();

    let (table, schema) = load_json(&path).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(schema.columns, vec!["id", "name"]);
    assert_eq!(table.rows[0][0], Value::Int64(7));
}

#[test]
fn load_json_truncates_long_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.json");
    let mut f = fs::File::create(&path).unwrap();
    write!(f, "[").unwrap();
    for i in 0..1_500 {
        if i > 0 {
            write!(f, ",").unwrap();
        }
        write!(f, "{{\"i\": {i}}}").unwrap();
    }
    write!(f, "]").unwrap();
    drop(f);

    let (table, schema) = load_json(&path).unwrap();
    assert_eq!(table.row_count(), MAX_DOCUMENTS);
    assert_eq!(schema.row_count, MAX_DOCUMENTS);
    assert_eq!(table.rows[0][0], Value::Int64(0));
    assert_eq!(
        table.rows[MAX_DOCUMENTS - 1][0],
        Value::Int64(MAX_DOCUMENTS as i64 - 1)
    );
}

#[test]
fn load_json_unions_keys_in_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.json");
    fs::write(
        &path,
        r#"[{"a": 1, "b": "x"}, {"a": 2, "c": true}, {"d": 0.5}]"#,
    )
    .unwrap();

    let (table, schema) = load_json(&path).unwrap();
    assert_eq!(schema.columns, vec!["a", "b", "c", "d"]);
    assert_eq!(schema.column_count, 4);

    // Keys absent from a document read as null in that row.
    assert_eq!(table.rows[0][2], Value::Null);
    assert_eq!(table.rows[0][3], Value::Null);
    assert_eq!(table.rows[1][1], Value::Null);
    assert_eq!(table.rows[1][2], Value::Bool(true));
    assert_eq!(table.rows[2][0], Value::Null);
    assert_eq!(table.rows[2][3], Value::Float64(0.5));
}

#[test]
fn load_json_serializes_nested_values_to_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested.json");
    fs::write(
        &path,
        r#"[{"id": 1, "meta": {"k": 1}}, {"id": 2, "meta": [1, 2]}, {"id": 3}]"#,
    )
    .unwrap();

    let (table, schema) = load_json(&path).unwrap();
    assert_eq!(schema.data_types["meta"], "string");
    assert_eq!(table.rows[0][1], Value::Utf8("{\"k\":1}".to_string()));
    assert_eq!(table.rows[1][1], Value::Utf8("[1,2]".to_string()));
    assert_eq!(table.rows[2][1], Value::Null);
}

#[test]
fn load_json_widens_mixed_numbers_to_float() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nums.json");
    fs::write(&path, r#"[{"v": 1}, {"v": 2.5}]"#).unwrap();

    let (table, schema) = load_json(&path).unwrap();
    assert_eq!(schema.data_types["v"], "float");
    assert_eq!(table.rows[0][0], Value::Float64(1.0));
}

#[test]
fn load_json_rejects_non_object_elements() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scalars.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let err = load_json(&path).unwrap_err();
    assert!(err.to_string().contains("not a JSON object"));
}

#[test]
fn validate_json_rejects_missing_file() {
    let err = validate_json("tests/fixtures/nope.json").unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn validate_json_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.yaml");
    fs::write(&path, "{}").unwrap();

    let err = validate_json(&path).unwrap_err();
    assert!(err.to_string().contains("must be a JSON file"));
}

#[test]
fn validate_json_rejects_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, "").unwrap();

    let err = validate_json(&path).unwrap_err();
    assert!(err.to_string().contains("empty"));
}

#[test]
fn validate_json_rejects_unparseable_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();

    let err = validate_json(&path).unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
}

#[test]
fn validate_json_rejects_scalar_roots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scalar.json");
    fs::write(&path, "42").unwrap();

    let err = validate_json(&path).unwrap_err();
    assert!(err.to_string().contains("object or array"));
}

#[test]
fn validate_json_accepts_fixture() {
    validate_json("tests/fixtures/people.json").unwrap();
}
