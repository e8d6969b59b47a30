//! Image upload route handler.
//!
//! The handler only brokers between the multipart body and the upload
//! store; file storage is an external collaborator.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::uploads::StoredUpload;
use crate::state::AppState;

/// `POST /api/upload` (admin, multipart) - store an image, return its URL.
#[instrument(skip(_admin, state, multipart))]
pub async fn upload(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredUpload>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(ToString::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

        let stored = state
            .uploads()
            .store(file_name.as_deref(), &bytes)
            .await?;
        tracing::info!(upload_id = %stored.id, url = %stored.url, "Image uploaded");
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
