//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cleanroom: data cleaning for tabular uploads
#[derive(Parser)]
#[command(name = "cleanroom")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Log level selected by the global flags.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show row, column, duplicate and missing-value counts
    Summary {
        /// Path to the data file (CSV/XLSX/TXT)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a cleaning method and write the cleaned file
    Clean {
        /// Path to the data file (CSV/XLSX/TXT)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Cleaning method (impute_by_mean, impute_by_mode, delete_missing_rows,
        /// delete_duplicates, remove_outliers; per column also delete_missing_row,
        /// delete_row_outlier)
        #[arg(short, long)]
        method: String,

        /// Apply the method to a single column
        #[arg(short, long)]
        column: Option<String>,

        /// Output path (default: cleaned_data.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the HTTP cleaning service
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Minutes an uploaded dataset stays available
        #[arg(long, default_value = "30", value_name = "MINUTES")]
        session_ttl: u32,

        /// Largest accepted upload in MiB
        #[arg(long, default_value = "50")]
        max_upload_mb: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flags() {
        let cli = Cli::parse_from(["cleanroom", "-v", "summary", "a.csv"]);
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::parse_from(["cleanroom", "summary", "a.csv", "--quiet"]);
        assert_eq!(cli.log_level(), "warn");

        let cli = Cli::parse_from(["cleanroom", "summary", "a.csv"]);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_clean_arguments() {
        let cli = Cli::parse_from([
            "cleanroom", "clean", "data.csv", "--method", "impute_by_mean", "--column", "age",
        ]);
        match cli.command {
            Commands::Clean { method, column, output, .. } => {
                assert_eq!(method, "impute_by_mean");
                assert_eq!(column.as_deref(), Some("age"));
                assert!(output.is_none());
            }
            _ => panic!("expected clean command"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::parse_from(["cleanroom", "serve"]);
        match cli.command {
            Commands::Serve { port, session_ttl, max_upload_mb } => {
                assert_eq!(port, 3141);
                assert_eq!(session_ttl, 30);
                assert_eq!(max_upload_mb, 50);
            }
            _ => panic!("expected serve command"),
        }
    }
}
