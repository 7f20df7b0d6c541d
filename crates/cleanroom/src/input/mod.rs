//! Input parsing and upload metadata.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{FileFormat, SourceMetadata};
