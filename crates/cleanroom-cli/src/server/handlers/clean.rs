//! Cleaning handler.

use axum::{
    Json,
    extract::{Path, State},
};
use cleanroom::{CleaningEngine, CleaningStats, DataSummary};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for cleaning.
///
/// Either `method` for the whole dataset, or `operation` with `column`.
#[derive(Deserialize)]
pub struct CleanRequest {
    pub method: Option<String>,
    pub operation: Option<String>,
    pub column: Option<String>,
}

/// Response after cleaning.
#[derive(Serialize)]
pub struct CleanResponse {
    pub stats: CleaningStats,
    pub message: String,
    pub summary: DataSummary,
}

/// POST /api/data/:id/clean
pub async fn clean_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CleanRequest>,
) -> Result<Json<CleanResponse>, ApiError> {
    let engine = CleaningEngine::new();

    let response = state
        .sessions
        .with_session(&id, |session| {
            let outcome = match (&req.operation, &req.column, &req.method) {
                (Some(operation), Some(column), _) => {
                    engine.clean_column(&session.dataset, operation, column)
                }
                (None, None, Some(method)) => engine.clean_dataset(&session.dataset, method),
                _ => {
                    return Err(ApiError::BadRequest(
                        "Provide either method, or operation and column".to_string(),
                    ));
                }
            };

            session.dataset = outcome.dataset;
            Ok(CleanResponse {
                stats: outcome.stats,
                message: outcome.stats.to_string(),
                summary: DataSummary::from_dataset(&session.dataset),
            })
        })
        .await?;

    info!(session = %id, stats = %response.stats, "dataset cleaned");
    Ok(Json(response))
}
