//! Download handler.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use cleanroom::Exporter;
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /api/download/:id
///
/// Encodes the current snapshot in the format of the original upload.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let file = state
        .sessions
        .with_session(&id, |session| {
            info!(
                session = %id,
                source = %session.source.hash,
                rows = session.dataset.row_count(),
                "exporting snapshot"
            );
            Ok(Exporter::export(&session.dataset, &session.original_file_name)?)
        })
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
