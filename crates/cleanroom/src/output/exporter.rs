//! Export a cleaned dataset in the format of the original upload.

use rust_xlsxwriter::Workbook;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::dataset::{Cell, Dataset};
use crate::error::{CleanroomError, Result};
use crate::input::FileFormat;

/// Worksheet name for spreadsheet exports.
const SHEET_NAME: &str = "Cleaned Data";

/// Base name of every exported file.
const EXPORT_STEM: &str = "cleaned_data";

/// Output format for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    /// Spreadsheets and CSV round-trip; anything else downloads as JSON.
    pub fn for_upload(original_file_name: &str) -> Self {
        match FileFormat::from_file_name(original_file_name) {
            Some(FileFormat::Xlsx) => ExportFormat::Xlsx,
            Some(FileFormat::Csv) => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }

    /// File extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    /// MIME type for the download.
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, xlsx, or json.", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// An encoded file ready for download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type.
    pub content_type: &'static str,
    /// Encoded contents.
    pub bytes: Vec<u8>,
}

/// Encodes datasets for download.
pub struct Exporter;

impl Exporter {
    /// Export in the format matching the original upload's extension.
    pub fn export(data: &Dataset, original_file_name: &str) -> Result<ExportedFile> {
        Self::export_as(data, ExportFormat::for_upload(original_file_name))
    }

    /// Export in an explicit format.
    pub fn export_as(data: &Dataset, format: ExportFormat) -> Result<ExportedFile> {
        let bytes = match format {
            ExportFormat::Csv => to_csv(data)?,
            ExportFormat::Xlsx => to_xlsx(data)?,
            ExportFormat::Json => serde_json::to_vec_pretty(data)?,
        };

        info!(%format, rows = data.row_count(), bytes = bytes.len(), "exported dataset");

        Ok(ExportedFile {
            file_name: format!("{}.{}", EXPORT_STEM, format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }
}

/// CSV with the first row's keys as the header.
fn to_csv(data: &Dataset) -> Result<Vec<u8>> {
    let columns = data.columns();
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns)?;
        for row in data.rows() {
            writer.write_record(columns.iter().map(|c| cell_text(row.get(c))))?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| CleanroomError::Export(e.to_string()))
}

/// Single-sheet workbook; the header is every key seen in any row.
fn to_xlsx(data: &Dataset) -> Result<Vec<u8>> {
    let columns = data.all_columns();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }

    for (r, row) in data.rows().iter().enumerate() {
        let sheet_row = (r + 1) as u32;
        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            match row.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::Number(n)) => {
                    if let Some(f) = n.as_f64() {
                        sheet.write_number(sheet_row, col, f)?;
                    }
                }
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(sheet_row, col, *b)?;
                }
                Some(other) => {
                    sheet.write_string(sheet_row, col, &cell_text(Some(other)))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Text form of a cell for export. Missing cells are empty and whole
/// floats lose their trailing `.0`.
pub fn cell_text(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use serde_json::json;

    fn sample() -> Dataset {
        let mut a = Row::new();
        a.insert("name".to_string(), json!("Smith, J"));
        a.insert("score".to_string(), json!(3.0));
        let mut b = Row::new();
        b.insert("name".to_string(), Value::Null);
        b.insert("score".to_string(), json!(2.5));
        b.insert("extra".to_string(), json!(true));
        Dataset::new(vec![a, b])
    }

    #[test]
    fn test_format_for_upload() {
        assert_eq!(ExportFormat::for_upload("a.xlsx"), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::for_upload("a.csv"), ExportFormat::Csv);
        assert_eq!(ExportFormat::for_upload("a.txt"), ExportFormat::Json);
        assert_eq!(ExportFormat::for_upload("a"), ExportFormat::Json);
    }

    #[test]
    fn test_csv_export() {
        let file = Exporter::export(&sample(), "input.csv").unwrap();
        assert_eq!(file.file_name, "cleaned_data.csv");
        assert_eq!(file.content_type, "text/csv");

        let text = String::from_utf8(file.bytes).unwrap();
        assert_eq!(text, "name,score\n\"Smith, J\",3\n,2.5\n");
    }

    #[test]
    fn test_json_export() {
        let file = Exporter::export(&sample(), "notes.txt").unwrap();
        assert_eq!(file.file_name, "cleaned_data.json");

        let parsed: Value = serde_json::from_slice(&file.bytes).unwrap();
        assert_eq!(parsed[1]["extra"], json!(true));
        assert!(String::from_utf8(file.bytes).unwrap().contains("\n  {"));
    }

    #[test]
    fn test_xlsx_export_produces_zip() {
        let file = Exporter::export(&sample(), "book.xlsx").unwrap();
        assert_eq!(file.file_name, "cleaned_data.xlsx");
        assert!(file.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_csv_export() {
        let file = Exporter::export_as(&Dataset::default(), ExportFormat::Csv).unwrap();
        assert!(file.bytes.is_empty());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&json!(4.0))), "4");
        assert_eq!(cell_text(Some(&json!(4))), "4");
        assert_eq!(cell_text(Some(&json!(0.1))), "0.1");
        assert_eq!(cell_text(Some(&json!(false))), "false");
    }
}
