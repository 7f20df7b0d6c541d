//! Integration tests for parsing uploads and exporting results.

use std::io::Write;

use serde_json::json;
use tempfile::{Builder, NamedTempFile};

use cleanroom::{
    CleaningEngine, CleanroomError, DataSummary, ExportFormat, Exporter, FileFormat, Parser,
};

/// Helper to create a temporary file with the given suffix and content.
fn create_test_file(suffix: &str, content: &[u8]) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content).expect("Failed to write to temp file");
    file
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_parse_csv_file() {
    let file = create_test_file(
        ".csv",
        b"id,name,score\n1,Alice,90\n2,Bob,\n3,Carol,75\n",
    );

    let (data, meta) = Parser::new().parse_file(file.path()).expect("Parse failed");

    assert_eq!(meta.format, FileFormat::Csv);
    assert_eq!(meta.row_count, 3);
    assert_eq!(meta.column_count, 3);
    assert!(meta.hash.starts_with("sha256:"));
    assert_eq!(data.get(1, "score"), Some(&json!("")));
}

#[test]
fn test_parse_semicolon_csv() {
    let file = create_test_file(".csv", b"a;b\n1;2\n3;4\n");

    let (data, _) = Parser::new().parse_file(file.path()).expect("Parse failed");

    assert_eq!(data.columns(), vec!["a", "b"]);
    assert_eq!(data.get(1, "b"), Some(&json!("4")));
}

#[test]
fn test_parse_text_file() {
    let file = create_test_file(".txt", b"alpha\n\n  beta  \n");

    let (data, meta) = Parser::new().parse_file(file.path()).expect("Parse failed");

    assert_eq!(meta.format, FileFormat::Text);
    assert_eq!(data.row_count(), 2);
    assert_eq!(data.get(1, "line"), Some(&json!("beta")));
}

#[test]
fn test_unsupported_extension() {
    let file = create_test_file(".json", b"[]");

    let result = Parser::new().parse_file(file.path());

    assert!(matches!(result, Err(CleanroomError::UnsupportedFormat(_))));
}

#[test]
fn test_missing_file() {
    let result = Parser::new().parse_file("/nonexistent/data.csv");
    assert!(matches!(result, Err(CleanroomError::Io { .. })));
}

#[test]
fn test_corrupt_workbook() {
    let result = Parser::new().parse_bytes("broken.xlsx", b"not a zip archive");
    assert!(matches!(result, Err(CleanroomError::Spreadsheet(_))));
}

// =============================================================================
// Upload, clean, download
// =============================================================================

#[test]
fn test_csv_clean_and_export() {
    let (data, meta) = Parser::new()
        .parse_bytes("scores.csv", b"name,score\nA,1\nB,\nC,5\nA,1\n")
        .expect("Parse failed");

    let summary = DataSummary::from_dataset(&data);
    assert_eq!(summary.missing_values["score"], 1);
    assert_eq!(summary.duplicate_count, 1);

    let engine = CleaningEngine::new();
    let deduped = engine.clean_dataset(&data, "delete_duplicates");
    let imputed = engine.clean_column(&deduped.dataset, "impute_by_mean", "score");
    assert_eq!(imputed.stats.values_imputed, 1);

    let file = Exporter::export(&imputed.dataset, &meta.file).expect("Export failed");
    assert_eq!(file.file_name, "cleaned_data.csv");
    assert_eq!(
        String::from_utf8(file.bytes).unwrap(),
        "name,score\nA,1\nB,3\nC,5\n"
    );
}

#[test]
fn test_xlsx_round_trip() {
    let (data, _) = Parser::new()
        .parse_bytes("people.csv", b"name,age,city\nAlice,30,Oslo\nBob,,Rome\n")
        .expect("Parse failed");
    let cleaned = CleaningEngine::new().clean_dataset(&data, "impute_by_mean");

    let file = Exporter::export_as(&cleaned.dataset, ExportFormat::Xlsx).expect("Export failed");
    assert_eq!(
        file.content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );

    let (reloaded, meta) = Parser::new()
        .parse_bytes(&file.file_name, &file.bytes)
        .expect("Reparse failed");

    assert_eq!(meta.format, FileFormat::Xlsx);
    assert_eq!(reloaded.columns(), vec!["name", "age", "city"]);
    assert_eq!(reloaded.row_count(), 2);
    assert_eq!(reloaded.get(0, "name"), Some(&json!("Alice")));
    assert_eq!(reloaded.get(0, "age"), Some(&json!("30")));
    assert_eq!(reloaded.get(1, "age"), Some(&json!(30)));
}

#[test]
fn test_xlsx_blank_cells_read_as_missing() {
    let (data, _) = Parser::new()
        .parse_bytes("t.csv", b"a,b\n1,\n")
        .expect("Parse failed");
    let file = Exporter::export_as(&data, ExportFormat::Xlsx).expect("Export failed");

    let (reloaded, _) = Parser::new()
        .parse_bytes("t.xlsx", &file.bytes)
        .expect("Reparse failed");

    assert!(cleanroom::is_missing(reloaded.get(0, "b")));
    assert_eq!(DataSummary::from_dataset(&reloaded).missing_values["b"], 1);
}

#[test]
fn test_xlsx_upload_mean_fill_deduplicates_with_parsed_numbers() {
    let data: cleanroom::Dataset =
        serde_json::from_value(json!([{"a": 3}, {"a": ""}, {"a": 3}])).expect("Invalid rows");
    let workbook = Exporter::export_as(&data, ExportFormat::Xlsx).expect("Export failed");

    let (uploaded, _) = Parser::new()
        .parse_bytes("upload.xlsx", &workbook.bytes)
        .expect("Parse failed");
    assert_eq!(uploaded.get(0, "a"), Some(&json!(3)));

    let engine = CleaningEngine::new();
    let imputed = engine.clean_dataset(&uploaded, "impute_by_mean");
    assert_eq!(imputed.dataset.get(1, "a"), Some(&json!(3)));

    let deduped = engine.clean_dataset(&imputed.dataset, "delete_duplicates");
    assert_eq!(deduped.dataset.row_count(), 1);
    assert_eq!(deduped.stats.rows_removed, 2);
}
