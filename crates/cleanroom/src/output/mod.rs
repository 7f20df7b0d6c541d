//! Download encoding for cleaned datasets.

mod exporter;

pub use exporter::{ExportFormat, ExportedFile, Exporter, cell_text};
