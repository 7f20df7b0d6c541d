//! Cleanroom: data cleaning for small tabular uploads.
//!
//! Cleanroom turns CSV, Excel and plain-text uploads into a [`Dataset`] of
//! loosely-typed rows and offers a handful of cleaning operations over it:
//! mean and mode imputation, dropping incomplete rows, removing exact
//! duplicates and removing IQR outliers.
//!
//! # Core Principles
//!
//! - **Non-destructive**: Every operation returns a new snapshot; inputs are never modified
//! - **Total**: Degenerate inputs give back the data unchanged with zero stats, never an error
//! - **Accountable**: Each operation reports how many rows and values it touched
//!
//! # Example
//!
//! ```no_run
//! use cleanroom::{CleaningEngine, DataSummary, Parser};
//!
//! let (data, _meta) = Parser::new().parse_file("survey.csv").unwrap();
//! println!("Duplicates: {}", DataSummary::from_dataset(&data).duplicate_count);
//!
//! let outcome = CleaningEngine::new().clean_dataset(&data, "delete_duplicates");
//! println!("{}", outcome.stats);
//! ```

pub mod clean;
pub mod dataset;
pub mod error;
pub mod input;
pub mod output;
pub mod summary;

pub use clean::{CleaningEngine, CleaningMethod, CleaningOutcome, CleaningStats, ColumnOperation};
pub use dataset::{Cell, Dataset, Row, is_missing};
pub use error::{CleanroomError, Result};
pub use input::{FileFormat, Parser, ParserConfig, SourceMetadata};
pub use output::{ExportFormat, ExportedFile, Exporter};
pub use summary::DataSummary;
