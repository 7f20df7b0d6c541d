//! In-memory tabular dataset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cell::{Cell, is_missing, number_cell};
use crate::error::{CleanroomError, Result};

/// One record: column name to cell, in column order.
pub type Row = IndexMap<String, Cell>;

/// Ordered sequence of rows.
///
/// Rows are open maps. The column list is taken from the first row and
/// later rows are not checked against it, so a row may lack a column
/// (the cell is then missing) or carry extra keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// All rows, in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Consume the dataset and return its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names, taken from the first row.
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Get the number of columns (keys of the first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    /// Every key that appears in any row, in first-seen order.
    pub fn all_columns(&self) -> Vec<String> {
        let mut seen: IndexMap<&str, ()> = IndexMap::new();
        for row in &self.rows {
            for key in row.keys() {
                seen.entry(key.as_str()).or_insert(());
            }
        }
        seen.into_keys().map(str::to_string).collect()
    }

    /// Cells of a column, `None` where a row lacks the key.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a Cell>> {
        self.rows.iter().map(move |row| row.get(column))
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Count missing cells in a column.
    pub fn missing_count(&self, column: &str) -> usize {
        self.column_values(column).filter(|cell| is_missing(*cell)).count()
    }

    /// Overwrite one cell. The column is appended to the row if absent.
    pub fn set_cell(&mut self, row: usize, column: &str, value: Cell) -> Result<()> {
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(CleanroomError::RowOutOfRange { index: row, len })?;
        target.insert(column.to_string(), value);
        Ok(())
    }

    /// Remove a row by index and return it.
    pub fn remove_row(&mut self, index: usize) -> Result<Row> {
        if index >= self.rows.len() {
            return Err(CleanroomError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Remove a column from every row.
    ///
    /// Returns the number of rows that held the column.
    pub fn remove_column(&mut self, column: &str) -> Result<usize> {
        let removed = self
            .rows
            .iter_mut()
            .filter_map(|row| row.shift_remove(column))
            .count();

        if removed == 0 {
            return Err(CleanroomError::ColumnNotFound(column.to_string()));
        }
        Ok(removed)
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Canonical key for structural row equality.
///
/// Two rows share a key exactly when they hold the same column/value pairs
/// in the same order. Strings are JSON-quoted, so `1` and `"1"` differ.
/// Numbers compare by value, so `3` and `3.0` share a key.
pub(crate) fn row_key(row: &Row) -> String {
    let mut key = String::new();
    for (column, cell) in row {
        key.push_str(&Value::from(column.as_str()).to_string());
        key.push(':');
        match cell {
            Value::Number(n) if n.is_f64() => {
                let canonical = n.as_f64().map(number_cell).unwrap_or(Value::Null);
                key.push_str(&canonical.to_string());
            }
            other => key.push_str(&other.to_string()),
        }
        key.push(',');
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_columns_from_first_row() {
        let data = Dataset::new(vec![
            row(&[("id", json!(1)), ("name", json!("a"))]),
            row(&[("id", json!(2)), ("extra", json!("x"))]),
        ]);

        assert_eq!(data.columns(), vec!["id", "name"]);
        assert_eq!(data.column_count(), 2);
        assert_eq!(data.all_columns(), vec!["id", "name", "extra"]);
        assert!(Dataset::default().columns().is_empty());
    }

    #[test]
    fn test_missing_count_includes_absent_keys() {
        let data = Dataset::new(vec![
            row(&[("a", json!("")), ("b", json!(1))]),
            row(&[("a", Value::Null)]),
            row(&[("a", json!("x")), ("b", json!(2))]),
        ]);

        assert_eq!(data.missing_count("a"), 2);
        assert_eq!(data.missing_count("b"), 1);
    }

    #[test]
    fn test_set_cell() {
        let mut data = Dataset::new(vec![row(&[("a", json!(""))])]);
        data.set_cell(0, "a", json!("filled")).unwrap();
        assert_eq!(data.get(0, "a"), Some(&json!("filled")));

        let err = data.set_cell(3, "a", json!(1)).unwrap_err();
        assert!(matches!(err, CleanroomError::RowOutOfRange { index: 3, len: 1 }));
    }

    #[test]
    fn test_remove_row_and_column() {
        let mut data = Dataset::new(vec![
            row(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))]),
            row(&[("a", json!(4)), ("c", json!(6))]),
        ]);

        assert_eq!(data.remove_column("b").unwrap(), 1);
        assert_eq!(data.columns(), vec!["a", "c"]);
        assert!(data.remove_column("missing").is_err());

        let removed = data.remove_row(0).unwrap();
        assert_eq!(removed.get("a"), Some(&json!(1)));
        assert_eq!(data.row_count(), 1);
        assert!(data.remove_row(1).is_err());
    }

    #[test]
    fn test_row_key_distinguishes_types_and_order() {
        let a = row(&[("x", json!(1))]);
        let b = row(&[("x", json!("1"))]);
        assert_ne!(row_key(&a), row_key(&b));

        let c = row(&[("x", json!(1)), ("y", json!(2))]);
        let d = row(&[("y", json!(2)), ("x", json!(1))]);
        assert_ne!(row_key(&c), row_key(&d));
        assert_eq!(row_key(&c), row_key(&c.clone()));
    }

    #[test]
    fn test_row_key_compares_numbers_by_value() {
        let int = row(&[("x", json!(3))]);
        let float = row(&[("x", json!(3.0))]);
        assert_eq!(row_key(&int), row_key(&float));
        assert_ne!(row_key(&int), row_key(&row(&[("x", json!(3.5))])));
    }

    #[test]
    fn test_serializes_as_array_of_objects() {
        let data = Dataset::new(vec![row(&[("b", json!(1)), ("a", json!("x"))])]);
        let text = serde_json::to_string(&data).unwrap();
        assert_eq!(text, r#"[{"b":1,"a":"x"}]"#);
    }
}
