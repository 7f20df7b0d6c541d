//! Summary command - show data-quality counts for a file.

use std::path::PathBuf;

use cleanroom::{CleaningMethod, DataSummary, Parser};
use colored::Colorize;

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (data, source) = Parser::new().parse_file(&file)?;
    let summary = DataSummary::from_dataset(&data);

    if json_output {
        let status = serde_json::json!({
            "file": source.file,
            "format": source.format,
            "hash": source.hash,
            "summary": summary,
            "suggested_methods": suggested_methods(&summary),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Data summary for".cyan().bold(),
        source.file.white()
    );
    println!();
    println!("  Rows:       {}", summary.row_count.to_string().white().bold());
    println!("  Columns:    {}", summary.column_count.to_string().white().bold());

    let duplicates = summary.duplicate_count.to_string();
    println!(
        "  Duplicates: {}",
        if summary.duplicate_count > 0 {
            duplicates.yellow().bold()
        } else {
            duplicates.green()
        }
    );

    println!();
    if summary.total_missing() == 0 {
        println!("{}", "No missing values.".green());
    } else {
        println!("{}", "Missing values by column:".cyan().bold());
        for (column, count) in summary.columns_with_missing() {
            println!("  {:<24} {}", column, count.to_string().yellow());
        }
    }

    let methods = suggested_methods(&summary);
    if !methods.is_empty() {
        println!();
        println!("{}", "Suggested cleaning:".cyan().bold());
        for method in methods {
            println!(
                "  {} - {}",
                format!("cleanroom clean {} --method {}", file.display(), method).white(),
                method.description()
            );
        }
    }

    Ok(())
}

/// Dataset-wide methods worth offering for this summary.
fn suggested_methods(summary: &DataSummary) -> Vec<CleaningMethod> {
    let mut methods = Vec::new();

    if summary.total_missing() > 0 {
        methods.extend([
            CleaningMethod::ImputeByMean,
            CleaningMethod::ImputeByMode,
            CleaningMethod::DeleteMissingRows,
        ]);
    }
    if summary.duplicate_count > 0 {
        methods.push(CleaningMethod::DeleteDuplicates);
    }
    if summary.row_count > 0 {
        methods.push(CleaningMethod::RemoveOutliers);
    }

    methods
}
