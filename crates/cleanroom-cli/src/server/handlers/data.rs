//! Dataset and summary handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use cleanroom::{DataSummary, Dataset};
use serde::Serialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for the data endpoint.
#[derive(Serialize)]
pub struct DataResponse {
    /// Current snapshot.
    pub data: Dataset,
    /// Upload time in milliseconds since the epoch.
    pub timestamp: i64,
}

/// GET /api/data/:id
pub async fn get_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse>, ApiError> {
    let response = state
        .sessions
        .with_session(&id, |session| {
            Ok(DataResponse {
                data: session.dataset.clone(),
                timestamp: session.created_at.timestamp_millis(),
            })
        })
        .await?;

    Ok(Json(response))
}

/// GET /api/data/:id/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataSummary>, ApiError> {
    let summary = state
        .sessions
        .with_session(&id, |session| Ok(DataSummary::from_dataset(&session.dataset)))
        .await?;

    Ok(Json(summary))
}
