//! Upload handler.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use cleanroom::Parser;
use serde::Serialize;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::{AppState, Session};

/// Multipart field holding the file.
const FILE_FIELD: &str = "file";

/// Response after a successful upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub message: String,
}

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let (dataset, source) = Parser::new().parse_bytes(&file_name, &bytes)?;
        let rows = dataset.row_count();
        let id = state.sessions.insert(Session::new(dataset, source)).await;

        info!(session = %id, file = %file_name, rows, "upload stored");

        return Ok(Json(UploadResponse {
            id,
            message: "File uploaded successfully".to_string(),
        }));
    }

    Err(ApiError::BadRequest("No file provided".to_string()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
