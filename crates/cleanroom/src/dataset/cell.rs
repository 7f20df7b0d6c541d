//! Cell predicates shared by every cleaning operation.

use std::borrow::Cow;

use serde_json::Value;

/// A single table cell.
///
/// Cells are dynamically typed: parsers produce strings for CSV and text
/// files, and numbers or booleans for spreadsheet cells. Mean imputation
/// writes plain numbers back.
pub type Cell = Value;

/// Check whether a cell is missing.
///
/// Absent keys, `null` and the empty string are all treated the same way.
/// Every operation goes through this predicate.
pub fn is_missing(cell: Option<&Cell>) -> bool {
    match cell {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Coerce a cell to a finite number.
///
/// Numbers are taken as they are and strings are parsed after trimming.
/// Anything else, including NaN and infinities spelled out in a string,
/// is not numeric.
pub fn numeric_value(cell: Option<&Cell>) -> Option<f64> {
    let number = match cell? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => return None,
    };

    number.is_finite().then_some(number)
}

/// String form of a cell, used to compare categorical values.
pub fn text_form(cell: &Cell) -> Cow<'_, str> {
    match cell {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Largest magnitude below which every whole `f64` is an exact integer (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Build a cell holding a number.
///
/// Whole values in the exact integer range are stored as integers, so an
/// imputed `3.0` equals a parsed `3`. Non-finite values become `null`.
pub fn number_cell(value: f64) -> Cell {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        return Value::from(value as i64);
    }

    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
