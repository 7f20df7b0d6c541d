//! API request handlers.

mod clean;
mod data;
mod download;
mod edit;
mod upload;

pub use clean::*;
pub use data::*;
pub use download::*;
pub use edit::*;
pub use upload::*;
