//! Axum application setup.

use std::time::Duration as StdDuration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use super::state::AppState;

/// How often expired sessions are swept.
const SWEEP_INTERVAL: StdDuration = StdDuration::from_secs(60);

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        .route("/upload", post(handlers::upload))
        // Session data
        .route("/data/:id", get(handlers::get_data))
        .route("/data/:id/summary", get(handlers::get_summary))
        .route("/data/:id/clean", post(handlers::clean_data))
        // Manual edits
        .route("/data/:id/cells", put(handlers::update_cell))
        .route("/data/:id/rows/:row", delete(handlers::delete_row))
        .route("/data/:id/columns/:column", delete(handlers::delete_column))
        // Export
        .route("/download/:id", get(handlers::download));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], state.config.port));

    // Sweep expired sessions in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                let active = sessions.len().await;
                info!(purged, active, "swept expired sessions");
            }
        }
    });

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("shutting down");
}
