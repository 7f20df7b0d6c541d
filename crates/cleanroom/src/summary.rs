//! Data-quality summary of a dataset snapshot.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, row_key};

/// Counts that drive which cleaning actions are offered.
///
/// Computed fresh from a snapshot; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns (keys of the first row).
    pub column_count: usize,
    /// Missing cells per column, in column order.
    pub missing_values: IndexMap<String, usize>,
    /// Rows minus distinct rows.
    pub duplicate_count: usize,
}

impl DataSummary {
    /// Summarize a dataset.
    pub fn from_dataset(data: &Dataset) -> Self {
        let missing_values = data
            .columns()
            .into_iter()
            .map(|column| {
                let missing = data.missing_count(&column);
                (column, missing)
            })
            .collect();

        Self {
            row_count: data.row_count(),
            column_count: data.column_count(),
            missing_values,
            duplicate_count: duplicate_count(data),
        }
    }

    /// Total missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.missing_values.values().sum()
    }

    /// Columns that have at least one missing cell.
    pub fn columns_with_missing(&self) -> impl Iterator<Item = (&str, usize)> {
        self.missing_values
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(column, count)| (column.as_str(), *count))
    }
}

/// Number of rows that repeat an earlier row exactly.
pub fn duplicate_count(data: &Dataset) -> usize {
    let distinct: HashSet<String> = data.rows().iter().map(row_key).collect();
    data.row_count() - distinct.len()
}
