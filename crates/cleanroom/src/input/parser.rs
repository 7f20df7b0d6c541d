//! Upload parser for CSV, Excel and plain-text files.

use std::fs;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use serde_json::Value;
use tracing::{info, warn};

use crate::dataset::{Cell, Dataset, Row, number_cell};
use crate::error::{CleanroomError, Result};
use super::source::{FileFormat, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use for CSV (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether to trim whitespace around CSV header names.
    pub trim_headers: bool,
    /// Column name for plain-text rows.
    pub text_column: String,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            trim_headers: true,
            text_column: "line".to_string(),
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    /// Use a fixed delimiter instead of auto-detection.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Stop after `max_rows` data rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Column name for plain-text rows.
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = column.into();
        self
    }
}

/// Parses uploaded files into datasets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file from disk. The format comes from its extension.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| CleanroomError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.parse_bytes(&file_name, &contents)
    }

    /// Parse uploaded bytes. The format comes from `file_name`'s extension.
    pub fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<(Dataset, SourceMetadata)> {
        let format = FileFormat::from_file_name(file_name)
            .ok_or_else(|| CleanroomError::UnsupportedFormat(file_name.to_string()))?;

        let dataset = match format {
            FileFormat::Csv => self.parse_csv(bytes)?,
            FileFormat::Xlsx => self.parse_xlsx(bytes)?,
            FileFormat::Text => self.parse_text(bytes),
        };

        info!(
            file = file_name,
            %format,
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "parsed upload"
        );

        let metadata = SourceMetadata::new(
            file_name,
            format,
            bytes,
            dataset.row_count(),
            dataset.column_count(),
        );

        Ok((dataset, metadata))
    }

    /// Parse delimited text with a header row. All cells are strings.
    fn parse_csv(&self, bytes: &[u8]) -> Result<Dataset> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                if self.config.trim_headers {
                    h.trim().to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut rows: Vec<Row> = Vec::new();
        let mut surplus_rows = 0;

        for result in reader.records() {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }

            let record = result?;
            if record.len() > headers.len() {
                surplus_rows += 1;
            }

            // Short records leave their trailing columns absent.
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(h, field)| (h.clone(), Value::String(field.to_string())))
                .collect();
            rows.push(row);
        }

        if surplus_rows > 0 {
            warn!(rows = surplus_rows, "dropped fields beyond the header width");
        }

        Ok(Dataset::new(rows))
    }

    /// Parse the first worksheet of an Excel workbook.
    ///
    /// The first row names the columns. Empty cells are left out of their
    /// row and fully blank rows are skipped.
    fn parse_xlsx(&self, bytes: &[u8]) -> Result<Dataset> {
        let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
            .map_err(|e| CleanroomError::Spreadsheet(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| CleanroomError::EmptyData("Workbook has no worksheets".to_string()))?
            .map_err(|e| CleanroomError::Spreadsheet(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let Some(header_cells) = sheet_rows.next() else {
            return Ok(Dataset::default());
        };

        let headers: Vec<String> = header_cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = cell.to_string();
                let name = name.trim();
                if name.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    name.to_string()
                }
            })
            .collect();

        let mut rows: Vec<Row> = Vec::new();
        for cells in sheet_rows {
            if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                break;
            }

            let row: Row = headers
                .iter()
                .zip(cells)
                .filter_map(|(h, cell)| spreadsheet_cell(cell).map(|v| (h.clone(), v)))
                .collect();

            if !row.is_empty() {
                rows.push(row);
            }
        }

        Ok(Dataset::new(rows))
    }

    /// One row per non-blank line, trimmed, under the text column.
    fn parse_text(&self, bytes: &[u8]) -> Dataset {
        let text = String::from_utf8_lossy(bytes);
        let limit = self.config.max_rows.unwrap_or(usize::MAX);

        text.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(limit)
            .map(|line| {
                let mut row = Row::new();
                row.insert(self.config.text_column.clone(), Value::String(line.to_string()));
                row
            })
            .collect()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a worksheet cell. Empty cells yield `None`.
fn spreadsheet_cell(cell: &Data) -> Option<Cell> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Float(f) => Some(number_cell(*f)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        other => Some(Value::String(other.to_string())),
    }
}

/// Detect the delimiter by analyzing the first few lines.
///
/// Falls back to a comma when nothing scores.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let Some(&first_count) = counts.first() else {
            continue;
        };
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;

        // Higher count with lower variance wins
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    best_delimiter
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
