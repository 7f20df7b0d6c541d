//! Fuzz target for the cleaning dispatchers.
//!
//! Builds a dataset from arbitrary cells and runs every method on it,
//! checking that the input is untouched and that removals are counted.

#![no_main]

use arbitrary::Arbitrary;
use cleanroom::{CleaningEngine, Dataset, Row};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

#[derive(Debug, Arbitrary)]
enum FuzzCell {
    Absent,
    Null,
    Int(i32),
    Float(f64),
    Text(String),
    Bool(bool),
}

#[derive(Debug, Arbitrary)]
struct Input {
    method: String,
    column: String,
    rows: Vec<[FuzzCell; 3]>,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 500 {
        return;
    }

    let data: Dataset = input
        .rows
        .into_iter()
        .map(|cells| {
            let mut row = Row::new();
            for (name, cell) in ["a", "b", "c"].into_iter().zip(cells) {
                let value = match cell {
                    FuzzCell::Absent => continue,
                    FuzzCell::Null => Value::Null,
                    FuzzCell::Int(i) => json!(i),
                    FuzzCell::Float(f) => json!(f),
                    FuzzCell::Text(s) => json!(s),
                    FuzzCell::Bool(b) => json!(b),
                };
                row.insert(name.to_string(), value);
            }
            row
        })
        .collect();

    let before = data.clone();
    let engine = CleaningEngine::new();

    let outcome = engine.clean_dataset(&data, &input.method);
    assert!(outcome.dataset.row_count() <= data.row_count());

    let column = engine.clean_column(&data, &input.method, &input.column);
    assert_eq!(
        data.row_count() - column.dataset.row_count(),
        column.stats.rows_removed + column.stats.outliers_removed
    );

    assert_eq!(data, before);
});
