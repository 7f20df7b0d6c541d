//! Cleanroom CLI - clean tabular uploads from the shell or over HTTP.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let result = match cli.command {
        Commands::Summary { file, json } => commands::summary::run(file, json),

        Commands::Clean {
            file,
            method,
            column,
            output,
        } => commands::clean::run(file, method, column, output),

        Commands::Serve {
            port,
            session_ttl,
            max_upload_mb,
        } => commands::serve::run(port, session_ttl, max_upload_mb),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over flags.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
