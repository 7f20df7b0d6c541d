//! Dataset model: rows of dynamically typed cells.

mod cell;
mod table;

pub use cell::{Cell, is_missing, number_cell, numeric_value, text_form};
pub use table::{Dataset, Row};

pub(crate) use table::row_key;
