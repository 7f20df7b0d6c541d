//! Cleaning methods, per-column operations and their results.

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Counters describing the effect of one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningStats {
    /// Rows dropped for missing values or duplication.
    pub rows_removed: usize,
    /// Cells replaced by an imputed value.
    pub values_imputed: usize,
    /// Rows dropped as outliers.
    pub outliers_removed: usize,
}

impl CleaningStats {
    /// Check whether the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for CleaningStats {
    fn add_assign(&mut self, other: Self) {
        self.rows_removed += other.rows_removed;
        self.values_imputed += other.values_imputed;
        self.outliers_removed += other.outliers_removed;
    }
}

/// Confirmation message shown after a cleaning pass.
impl fmt::Display for CleaningStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows removed, {} values imputed, {} outliers removed",
            self.rows_removed, self.values_imputed, self.outliers_removed
        )
    }
}

/// New dataset snapshot plus the stats of the pass that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningOutcome {
    pub dataset: Dataset,
    pub stats: CleaningStats,
}

impl CleaningOutcome {
    /// An outcome that leaves the dataset as it was.
    pub fn unchanged(dataset: &Dataset) -> Self {
        Self {
            dataset: dataset.clone(),
            stats: CleaningStats::default(),
        }
    }
}

/// Dataset-wide cleaning method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningMethod {
    /// Fill missing and non-numeric cells with each column's mean.
    ImputeByMean,
    /// Fill missing cells with each column's most frequent value.
    ImputeByMode,
    /// Drop every row holding at least one missing cell.
    DeleteMissingRows,
    /// Drop repeated rows, keeping first occurrences.
    DeleteDuplicates,
    /// Drop rows whose value is an IQR outlier in any column.
    RemoveOutliers,
}

impl CleaningMethod {
    /// Every method, in menu order.
    pub const ALL: [CleaningMethod; 5] = [
        CleaningMethod::ImputeByMean,
        CleaningMethod::ImputeByMode,
        CleaningMethod::DeleteMissingRows,
        CleaningMethod::DeleteDuplicates,
        CleaningMethod::RemoveOutliers,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            CleaningMethod::ImputeByMean => "impute_by_mean",
            CleaningMethod::ImputeByMode => "impute_by_mode",
            CleaningMethod::DeleteMissingRows => "delete_missing_rows",
            CleaningMethod::DeleteDuplicates => "delete_duplicates",
            CleaningMethod::RemoveOutliers => "remove_outliers",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            CleaningMethod::ImputeByMean => {
                "Replace all missing values with the mean of their respective columns"
            }
            CleaningMethod::ImputeByMode => {
                "Replace missing values with the most common value in each column"
            }
            CleaningMethod::DeleteMissingRows => "Remove all rows that contain any missing values",
            CleaningMethod::DeleteDuplicates => "Delete all duplicate entries from the dataset",
            CleaningMethod::RemoveOutliers => {
                "Delete rows containing values that are statistical outliers"
            }
        }
    }
}

impl FromStr for CleaningMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CleaningMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown cleaning method: {}. Use: impute_by_mean, impute_by_mode, \
                     delete_missing_rows, delete_duplicates, or remove_outliers.",
                    s
                )
            })
    }
}

impl fmt::Display for CleaningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaning operation applied to a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOperation {
    /// Fill missing and non-numeric cells with the column mean.
    ImputeByMean,
    /// Fill missing cells with the most frequent value.
    ImputeByMode,
    /// Drop rows where this column is missing.
    DeleteMissingRow,
    /// Drop rows where this column holds an outlier.
    DeleteRowOutlier,
}

impl ColumnOperation {
    /// Every operation, in menu order.
    pub const ALL: [ColumnOperation; 4] = [
        ColumnOperation::ImputeByMean,
        ColumnOperation::ImputeByMode,
        ColumnOperation::DeleteMissingRow,
        ColumnOperation::DeleteRowOutlier,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnOperation::ImputeByMean => "impute_by_mean",
            ColumnOperation::ImputeByMode => "impute_by_mode",
            ColumnOperation::DeleteMissingRow => "delete_missing_row",
            ColumnOperation::DeleteRowOutlier => "delete_row_outlier",
        }
    }
}

impl FromStr for ColumnOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impute_by_mean" => Ok(ColumnOperation::ImputeByMean),
            "impute_by_mode" => Ok(ColumnOperation::ImputeByMode),
            "delete_missing_row" | "delete_missing_rows" => Ok(ColumnOperation::DeleteMissingRow),
            "delete_row_outlier" | "remove_outliers" => Ok(ColumnOperation::DeleteRowOutlier),
            _ => Err(format!(
                "Unknown column operation: {}. Use: impute_by_mean, impute_by_mode, \
                 delete_missing_row, or delete_row_outlier.",
                s
            )),
        }
    }
}

impl fmt::Display for ColumnOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
