//! Upload formats and source metadata.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Delimited text with a header row.
    Csv,
    /// Excel workbook; only the first sheet is read.
    Xlsx,
    /// Plain text, one row per non-blank line.
    Text,
}

impl FileFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "txt" => Some(FileFormat::Text),
            _ => None,
        }
    }

    /// Short name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Text => "text",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name as uploaded.
    pub file: String,
    /// Detected format.
    pub format: FileFormat,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of parsed rows.
    pub row_count: usize,
    /// Number of columns in the first row.
    pub column_count: usize,
    /// When the file was parsed.
    pub uploaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for parsed file contents.
    pub fn new(
        file: impl Into<String>,
        format: FileFormat,
        contents: &[u8],
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(contents);

        Self {
            file: file.into(),
            format,
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes: contents.len() as u64,
            row_count,
            column_count,
            uploaded_at: Utc::now(),
        }
    }
}
