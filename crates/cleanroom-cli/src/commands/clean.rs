//! Clean command - apply a cleaning method and write the result.

use std::fs;
use std::path::PathBuf;

use cleanroom::{
    CleaningEngine, CleaningMethod, CleaningOutcome, CleanroomError, ColumnOperation, Dataset,
    Exporter, Parser,
};
use colored::Colorize;

pub fn run(
    file: PathBuf,
    method: String,
    column: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (data, source) = Parser::new().parse_file(&file)?;
    let outcome = apply(&data, &method, column.as_deref())?;

    let title = match &column {
        Some(column) => format!("Cleaned column {}", column),
        None => "Dataset cleaned".to_string(),
    };
    println!("{} {}", title.cyan().bold(), format!("({})", method).white());
    println!("  {}", outcome.stats);

    let exported = Exporter::export(&outcome.dataset, &source.file)?;
    let output_path = output.unwrap_or_else(|| file.with_file_name(&exported.file_name));

    fs::write(&output_path, &exported.bytes).map_err(|e| CleanroomError::Io {
        path: output_path.clone(),
        source: e,
    })?;

    println!();
    println!(
        "{} {} rows to {}",
        "Wrote".green().bold(),
        outcome.dataset.row_count(),
        output_path.display()
    );

    Ok(())
}

/// Resolve the method name and run it. Unlike the engine's string
/// dispatchers, unknown names and columns are reported as errors here.
fn apply(
    data: &Dataset,
    method: &str,
    column: Option<&str>,
) -> Result<CleaningOutcome, Box<dyn std::error::Error>> {
    let engine = CleaningEngine::new();

    match column {
        Some(column) => {
            let operation: ColumnOperation = method.parse()?;
            if !data.all_columns().iter().any(|c| c == column) {
                return Err(CleanroomError::ColumnNotFound(column.to_string()).into());
            }
            Ok(engine.apply_column_operation(data, operation, column))
        }
        None => {
            let method: CleaningMethod = method.parse()?;
            Ok(engine.apply_method(data, method))
        }
    }
}
