//! Cleaning engine: pure transformations over a dataset.

use std::borrow::Cow;
use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::dataset::{Cell, Dataset, Row, is_missing, number_cell, numeric_value, row_key, text_form};

use super::operations::{CleaningMethod, CleaningOutcome, CleaningStats, ColumnOperation};

/// Smallest numeric sample for which quartiles are computed.
pub const MIN_OUTLIER_SAMPLES: usize = 4;

/// IQR multiplier for the outlier fences.
const IQR_FENCE: f64 = 1.5;

/// Engine for cleaning datasets.
///
/// Every operation borrows its input and returns a fresh snapshot, so the
/// caller's dataset is never modified. Degenerate inputs (no usable values,
/// too few samples, unknown method names) give back the input unchanged
/// with zero stats instead of an error.
pub struct CleaningEngine;

impl CleaningEngine {
    /// Create a new cleaning engine.
    pub fn new() -> Self {
        Self
    }

    /// Replace missing and non-numeric cells of `column` with the column mean.
    pub fn impute_by_mean(&self, data: &Dataset, column: &str) -> CleaningOutcome {
        let values: Vec<f64> = data
            .column_values(column)
            .filter(|cell| !is_missing(*cell))
            .filter_map(numeric_value)
            .collect();

        if values.is_empty() {
            debug!(column, "no numeric values, skipping mean imputation");
            return CleaningOutcome::unchanged(data);
        }

        let mean = column_mean(&values);
        if !mean.is_finite() {
            debug!(column, "mean is not finite, skipping mean imputation");
            return CleaningOutcome::unchanged(data);
        }
        let fill = number_cell(mean);

        let mut imputed = 0;
        let rows = data
            .rows()
            .iter()
            .map(|row| {
                let cell = row.get(column);
                if is_missing(cell) || numeric_value(cell).is_none() {
                    imputed += 1;
                    with_cell(row, column, fill.clone())
                } else {
                    row.clone()
                }
            })
            .collect();

        debug!(column, mean, imputed, "mean imputation");

        CleaningOutcome {
            dataset: Dataset::new(rows),
            stats: CleaningStats {
                values_imputed: imputed,
                ..CleaningStats::default()
            },
        }
    }

    /// Replace missing cells of `column` with its most frequent value.
    ///
    /// Values are compared by their string form. On a tie the value seen
    /// first wins. The fill is the first cell seen with the winning form, so
    /// a numeric mode stays a number.
    pub fn impute_by_mode(&self, data: &Dataset, column: &str) -> CleaningOutcome {
        let mut frequency: IndexMap<Cow<'_, str>, (usize, &Cell)> = IndexMap::new();
        let mut missing = 0;

        for cell in data.column_values(column) {
            match cell {
                Some(value) if !is_missing(cell) => {
                    frequency.entry(text_form(value)).or_insert((0, value)).0 += 1;
                }
                _ => missing += 1,
            }
        }

        let mut mode: Option<(usize, &Cell)> = None;
        for &(count, value) in frequency.values() {
            if mode.is_none_or(|(best, _)| count > best) {
                mode = Some((count, value));
            }
        }

        let Some((count, mode)) = mode else {
            debug!(column, "no present values, skipping mode imputation");
            return CleaningOutcome::unchanged(data);
        };

        let rows = data
            .rows()
            .iter()
            .map(|row| {
                if is_missing(row.get(column)) {
                    with_cell(row, column, mode.clone())
                } else {
                    row.clone()
                }
            })
            .collect();

        debug!(column, mode = %text_form(mode), count, imputed = missing, "mode imputation");

        CleaningOutcome {
            dataset: Dataset::new(rows),
            stats: CleaningStats {
                values_imputed: missing,
                ..CleaningStats::default()
            },
        }
    }

    /// Drop rows where `column` is missing.
    pub fn delete_missing_rows(&self, data: &Dataset, column: &str) -> CleaningOutcome {
        let kept: Dataset = data
            .rows()
            .iter()
            .filter(|row| !is_missing(row.get(column)))
            .cloned()
            .collect();

        let rows_removed = data.row_count() - kept.row_count();
        debug!(column, rows_removed, "deleted rows with missing values");

        CleaningOutcome {
            dataset: kept,
            stats: CleaningStats {
                rows_removed,
                ..CleaningStats::default()
            },
        }
    }

    /// Drop rows whose `column` value lies outside the IQR fences.
    ///
    /// Rows with a missing or non-numeric value are always kept.
    pub fn remove_outliers(&self, data: &Dataset, column: &str) -> CleaningOutcome {
        let mut values: Vec<f64> = data
            .column_values(column)
            .filter(|cell| !is_missing(*cell))
            .filter_map(numeric_value)
            .collect();

        let Some((lower, upper)) = iqr_bounds(&mut values) else {
            debug!(column, samples = values.len(), "too few numeric values for outlier detection");
            return CleaningOutcome::unchanged(data);
        };

        let kept: Dataset = data
            .rows()
            .iter()
            .filter(|row| match numeric_value(row.get(column)) {
                Some(value) => value >= lower && value <= upper,
                None => true,
            })
            .cloned()
            .collect();

        let outliers_removed = data.row_count() - kept.row_count();
        debug!(column, lower, upper, outliers_removed, "removed outliers");

        CleaningOutcome {
            dataset: kept,
            stats: CleaningStats {
                outliers_removed,
                ..CleaningStats::default()
            },
        }
    }

    /// Apply a per-column operation given by name.
    ///
    /// Unknown operation names leave the dataset unchanged.
    pub fn clean_column(&self, data: &Dataset, operation: &str, column: &str) -> CleaningOutcome {
        match operation.parse::<ColumnOperation>() {
            Ok(op) => self.apply_column_operation(data, op, column),
            Err(_) => {
                debug!(operation, column, "unknown column operation, dataset unchanged");
                CleaningOutcome::unchanged(data)
            }
        }
    }

    /// Apply a per-column operation.
    pub fn apply_column_operation(
        &self,
        data: &Dataset,
        operation: ColumnOperation,
        column: &str,
    ) -> CleaningOutcome {
        match operation {
            ColumnOperation::ImputeByMean => self.impute_by_mean(data, column),
            ColumnOperation::ImputeByMode => self.impute_by_mode(data, column),
            ColumnOperation::DeleteMissingRow => self.delete_missing_rows(data, column),
            ColumnOperation::DeleteRowOutlier => self.remove_outliers(data, column),
        }
    }

    /// Apply a dataset-wide method given by name.
    ///
    /// Unknown method names leave the dataset unchanged.
    pub fn clean_dataset(&self, data: &Dataset, method: &str) -> CleaningOutcome {
        match method.parse::<CleaningMethod>() {
            Ok(method) => self.apply_method(data, method),
            Err(_) => {
                debug!(method, "unknown cleaning method, dataset unchanged");
                CleaningOutcome::unchanged(data)
            }
        }
    }

    /// Apply a dataset-wide method.
    ///
    /// Imputation and outlier removal visit the columns of the first row in
    /// order, each step seeing the previous step's output.
    pub fn apply_method(&self, data: &Dataset, method: CleaningMethod) -> CleaningOutcome {
        let outcome = match method {
            CleaningMethod::ImputeByMean => self.fold_columns(data, Self::impute_by_mean),
            CleaningMethod::ImputeByMode => self.fold_columns(data, Self::impute_by_mode),
            CleaningMethod::DeleteMissingRows => self.delete_incomplete_rows(data),
            CleaningMethod::DeleteDuplicates => self.delete_duplicates(data),
            CleaningMethod::RemoveOutliers => self.fold_columns(data, Self::remove_outliers),
        };

        debug!(%method, stats = %outcome.stats, "dataset cleaned");
        outcome
    }

    /// Thread the dataset through `step` once per column, summing stats.
    fn fold_columns(
        &self,
        data: &Dataset,
        step: fn(&Self, &Dataset, &str) -> CleaningOutcome,
    ) -> CleaningOutcome {
        let mut outcome = CleaningOutcome::unchanged(data);

        for column in data.columns() {
            let next = step(self, &outcome.dataset, &column);
            outcome.dataset = next.dataset;
            outcome.stats += next.stats;
        }

        outcome
    }

    /// Keep only rows in which every cell is present.
    fn delete_incomplete_rows(&self, data: &Dataset) -> CleaningOutcome {
        let kept: Dataset = data
            .rows()
            .iter()
            .filter(|row| row.values().all(|cell| !is_missing(Some(cell))))
            .cloned()
            .collect();

        CleaningOutcome {
            stats: CleaningStats {
                rows_removed: data.row_count() - kept.row_count(),
                ..CleaningStats::default()
            },
            dataset: kept,
        }
    }

    /// Keep the first occurrence of each distinct row.
    fn delete_duplicates(&self, data: &Dataset) -> CleaningOutcome {
        let mut seen = HashSet::new();
        let kept: Dataset = data
            .rows()
            .iter()
            .filter(|row| seen.insert(row_key(row)))
            .cloned()
            .collect();

        CleaningOutcome {
            stats: CleaningStats {
                rows_removed: data.row_count() - kept.row_count(),
                ..CleaningStats::default()
            },
            dataset: kept,
        }
    }
}

impl Default for CleaningEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Outlier fences from index-based quartiles.
///
/// Sorts `values` in place. Q1 and Q3 are the sorted values at
/// `floor(n / 4)` and `floor(3n / 4)`, without interpolation. Returns
/// `None` when fewer than [`MIN_OUTLIER_SAMPLES`] values are given.
pub fn iqr_bounds(values: &mut [f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < MIN_OUTLIER_SAMPLES {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let q1 = values[n / 4];
    let q3 = values[3 * n / 4];
    let iqr = q3 - q1;

    Some((q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr))
}

/// Arithmetic mean of finite values.
///
/// Falls back to summing pre-divided terms when the plain sum overflows.
fn column_mean(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}

/// Copy of `row` with `column` set to `value`.
fn with_cell(row: &Row, column: &str, value: Cell) -> Row {
    let mut row = row.clone();
    row.insert(column.to_string(), value);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn column(name: &str, values: Vec<Value>) -> Dataset {
        values
            .into_iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert(name.to_string(), v);
                row
            })
            .collect()
    }

    fn values_of(data: &Dataset, name: &str) -> Vec<Option<Value>> {
        data.column_values(name).map(|c| c.cloned()).collect()
    }

    #[test]
    fn test_iqr_bounds() {
        let mut values = vec![10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(iqr_bounds(&mut values), Some((-4.5, 15.5)));
        assert_eq!(values[0], 1.0);

        let mut few = vec![1.0, 2.0, 3.0];
        assert_eq!(iqr_bounds(&mut few), None);
    }

    #[test]
    fn test_iqr_bounds_four_values() {
        // n = 4: Q1 = sorted[1], Q3 = sorted[3]
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(iqr_bounds(&mut values), Some((-1.0, 7.0)));
    }

    #[test]
    fn test_mean_replaces_non_numeric_text() {
        let data = column("x", vec![json!("2"), json!("oops"), json!(4)]);
        let outcome = CleaningEngine::new().impute_by_mean(&data, "x");

        assert_eq!(outcome.stats.values_imputed, 1);
        assert_eq!(
            values_of(&outcome.dataset, "x"),
            vec![Some(json!("2")), Some(json!(3)), Some(json!(4))]
        );
    }

    #[test]
    fn test_mean_appends_absent_column() {
        let mut first = Row::new();
        first.insert("id".to_string(), json!(1));
        first.insert("x".to_string(), json!(10));
        let mut second = Row::new();
        second.insert("id".to_string(), json!(2));
        let data = Dataset::new(vec![first, second]);

        let outcome = CleaningEngine::new().impute_by_mean(&data, "x");
        assert_eq!(outcome.stats.values_imputed, 1);
        assert_eq!(outcome.dataset.get(1, "x"), Some(&json!(10)));
    }

    #[test]
    fn test_mean_without_numbers_is_noop() {
        let data = column("x", vec![json!("a"), json!(""), Value::Null]);
        let outcome = CleaningEngine::new().impute_by_mean(&data, "x");
        assert_eq!(outcome.dataset, data);
        assert!(outcome.stats.is_empty());
    }

    #[test]
    fn test_mean_of_huge_values_stays_finite() {
        let data = column("x", vec![json!(1e308), json!(1e308), json!("")]);
        let outcome = CleaningEngine::new().impute_by_mean(&data, "x");

        assert_eq!(outcome.stats.values_imputed, 1);
        assert_eq!(outcome.dataset.missing_count("x"), 0);
        let filled = outcome.dataset.get(2, "x").and_then(Value::as_f64).unwrap();
        assert!((filled - 1e308).abs() <= 1e308 * 1e-12);
    }

    #[test]
    fn test_mean_keeps_fractional_fill() {
        let data = column("x", vec![json!(1), json!(2), Value::Null]);
        let outcome = CleaningEngine::new().impute_by_mean(&data, "x");
        assert_eq!(outcome.dataset.get(2, "x"), Some(&json!(1.5)));
    }

    #[test]
    fn test_mode_compares_string_forms() {
        let data = column("x", vec![json!(5), json!("5"), json!(""), json!("7")]);
        let outcome = CleaningEngine::new().impute_by_mode(&data, "x");

        // 5 and "5" share a key; the first-seen cell is used as the fill.
        assert_eq!(outcome.dataset.get(2, "x"), Some(&json!(5)));
        assert_eq!(outcome.stats.values_imputed, 1);
    }

    #[test]
    fn test_mode_leaves_non_numeric_values() {
        let data = column("x", vec![json!("b"), json!("b"), json!("a"), Value::Null]);
        let outcome = CleaningEngine::new().impute_by_mode(&data, "x");
        assert_eq!(
            values_of(&outcome.dataset, "x"),
            vec![
                Some(json!("b")),
                Some(json!("b")),
                Some(json!("a")),
                Some(json!("b"))
            ]
        );
    }

    #[test]
    fn test_remove_outliers_keeps_non_numeric_rows() {
        let data = column(
            "x",
            vec![
                json!(1),
                json!(2),
                json!(3),
                json!(4),
                json!("n/a"),
                json!(""),
                json!(1000),
            ],
        );
        let outcome = CleaningEngine::new().remove_outliers(&data, "x");

        assert_eq!(outcome.stats.outliers_removed, 1);
        assert_eq!(outcome.dataset.row_count(), 6);
        assert!(
            outcome
                .dataset
                .column_values("x")
                .all(|c| c != Some(&json!(1000)))
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        // sorted [-1, 2, 2, 4, 4, 7]: Q1 = 2, Q3 = 4, fences [-1, 7]
        let data = column("x", vec![json!(2), json!(4), json!(7), json!(2), json!(4), json!(-1)]);
        let outcome = CleaningEngine::new().remove_outliers(&data, "x");
        assert_eq!(outcome.stats.outliers_removed, 0);
    }

    #[test]
    fn test_unknown_column_operation_is_noop() {
        let data = column("x", vec![json!(""), json!(1)]);
        let outcome = CleaningEngine::new().clean_column(&data, "explode", "x");
        assert_eq!(outcome, CleaningOutcome::unchanged(&data));
    }

    #[test]
    fn test_operations_on_absent_column() {
        let data = column("x", vec![json!(1), json!(2)]);
        let engine = CleaningEngine::new();

        assert!(engine.impute_by_mean(&data, "nope").stats.is_empty());
        assert!(engine.impute_by_mode(&data, "nope").stats.is_empty());
        assert!(engine.remove_outliers(&data, "nope").stats.is_empty());

        // Every row is missing the column, so every row goes.
        let outcome = engine.delete_missing_rows(&data, "nope");
        assert_eq!(outcome.stats.rows_removed, 2);
        assert!(outcome.dataset.is_empty());
    }
}
