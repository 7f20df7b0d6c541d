//! Serve command - run the HTTP cleaning service.

use colored::Colorize;

use crate::server::{
    app,
    state::{AppState, ServerConfig},
};

pub fn run(
    port: u16,
    session_ttl: u32,
    max_upload_mb: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::default()
        .with_port(port)
        .with_session_ttl_minutes(session_ttl)
        .with_max_upload_mb(max_upload_mb);

    let url = format!("http://localhost:{}", config.port);
    println!();
    println!(
        "{} {}",
        "Starting cleaning server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Upload:   POST {}/api/upload", url);
    println!("  Sessions: expire after {} minutes", session_ttl);
    println!("  Limit:    {} MiB per upload", max_upload_mb);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let state = AppState::new(config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state))?;

    println!("{}", "Server stopped.".yellow());
    Ok(())
}
