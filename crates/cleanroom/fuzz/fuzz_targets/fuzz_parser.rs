//! Fuzz target for the upload parser.
//!
//! This fuzzer tests that the CSV, Excel and text parsers:
//! 1. Never panic on malformed input
//! 2. Handle all delimiter combinations
//! 3. Don't allocate unbounded memory

#![no_main]

use cleanroom::{DataSummary, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    for name in ["upload.csv", "upload.xlsx", "upload.txt"] {
        if let Ok((dataset, meta)) = parser.parse_bytes(name, data) {
            assert_eq!(meta.row_count, dataset.row_count());
            let _ = DataSummary::from_dataset(&dataset);
        }
    }
});
