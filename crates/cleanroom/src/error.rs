//! Error types for the Cleanroom library.
//!
//! The cleaning engine itself is total and never fails. These errors come
//! from the collaborators around it: file parsing, export and table edits.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Cleanroom operations.
#[derive(Debug, Error)]
pub enum CleanroomError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error reading an Excel workbook.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Error writing an Excel workbook.
    #[error("Spreadsheet export error: {0}")]
    SpreadsheetExport(#[from] rust_xlsxwriter::XlsxError),

    /// Error encoding an export.
    #[error("Export error: {0}")]
    Export(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Row index outside the dataset.
    #[error("Row {index} out of range (dataset has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Column not present in the dataset.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Cleanroom operations.
pub type Result<T> = std::result::Result<T, CleanroomError>;
