//! Cleaning engine: missing-value imputation, row deletion, duplicate and
//! outlier removal.

mod engine;
mod operations;

pub use engine::{CleaningEngine, MIN_OUTLIER_SAMPLES, iqr_bounds};
pub use operations::{CleaningMethod, CleaningOutcome, CleaningStats, ColumnOperation};
