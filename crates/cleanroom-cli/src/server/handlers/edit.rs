//! Manual table edits: cells, rows and columns.

use axum::{
    Json,
    extract::{Path, State},
};
use cleanroom::DataSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for a cell update.
#[derive(Deserialize)]
pub struct CellUpdate {
    pub row: usize,
    pub column: String,
    pub value: Value,
}

/// Response after an edit.
#[derive(Serialize)]
pub struct EditResponse {
    pub message: String,
    pub summary: DataSummary,
}

/// PUT /api/data/:id/cells
pub async fn update_cell(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CellUpdate>,
) -> Result<Json<EditResponse>, ApiError> {
    let response = state
        .sessions
        .with_session(&id, |session| {
            session.dataset.set_cell(req.row, &req.column, req.value)?;
            Ok(EditResponse {
                message: "The cell value has been updated.".to_string(),
                summary: DataSummary::from_dataset(&session.dataset),
            })
        })
        .await?;

    Ok(Json(response))
}

/// DELETE /api/data/:id/rows/:row
pub async fn delete_row(
    State(state): State<AppState>,
    Path((id, row)): Path<(String, usize)>,
) -> Result<Json<EditResponse>, ApiError> {
    let response = state
        .sessions
        .with_session(&id, |session| {
            session.dataset.remove_row(row)?;
            Ok(EditResponse {
                message: "The row has been removed from the dataset.".to_string(),
                summary: DataSummary::from_dataset(&session.dataset),
            })
        })
        .await?;

    Ok(Json(response))
}

/// DELETE /api/data/:id/columns/:column
pub async fn delete_column(
    State(state): State<AppState>,
    Path((id, column)): Path<(String, String)>,
) -> Result<Json<EditResponse>, ApiError> {
    let response = state
        .sessions
        .with_session(&id, |session| {
            session.dataset.remove_column(&column)?;
            Ok(EditResponse {
                message: format!("The column \"{}\" has been removed from the dataset.", column),
                summary: DataSummary::from_dataset(&session.dataset),
            })
        })
        .await?;

    Ok(Json(response))
}
