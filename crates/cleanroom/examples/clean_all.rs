//! Example: Summarize a data file and try every cleaning method on it.
//!
//! Usage:
//!   cargo run --example clean_all -- <file_path>
//!
//! Example:
//!   cargo run --example clean_all -- survey.csv

use std::env;
use std::path::Path;

use cleanroom::{CleaningEngine, CleaningMethod, DataSummary, Parser};

fn main() -> cleanroom::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example clean_all -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example clean_all -- survey.csv");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Cleanroom: {}", file_path);
    println!("{}", separator);
    println!();

    let (data, source) = Parser::new().parse_file(path)?;

    // Print source metadata
    println!("## Source Metadata");
    println!("  File: {}", source.file);
    println!("  Format: {}", source.format);
    println!("  Hash: {}", source.hash);
    println!("  Rows: {}", source.row_count);
    println!("  Columns: {}", source.column_count);
    println!();

    // Print summary
    let summary = DataSummary::from_dataset(&data);
    println!("## Summary");
    println!("  Duplicates: {}", summary.duplicate_count);
    println!("  Missing cells: {}", summary.total_missing());
    for (column, count) in summary.columns_with_missing() {
        println!("    {:20} {}", column, count);
    }
    println!();

    // Each method runs on the original upload
    println!("## Methods");
    let engine = CleaningEngine::new();
    for method in CleaningMethod::ALL {
        let outcome = engine.apply_method(&data, method);
        println!(
            "  {:20} {:>6} rows left  ({})",
            method.as_str(),
            outcome.dataset.row_count(),
            outcome.stats
        );
    }

    Ok(())
}
