//! Handlers for the `/uploads` resource.
//!
//! Seed images are uploaded ahead of submission; the returned upload id
//! goes into `StorySubmission.upload_id`.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload returned by a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub upload_id: String,
}

/// POST /uploads -- accept a multipart seed image.
///
/// Expects a single `file` field; the image format is validated from the
/// file header before anything is persisted.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResponse>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }

        let upload_id = state.service.save_upload(&bytes).await?;
        return Ok((
            StatusCode::CREATED,
            Json(DataResponse {
                data: UploadResponse { upload_id },
            }),
        ));
    }

    Err(AppError::BadRequest(
        "Multipart body must contain a 'file' field".into(),
    ))
}

/// DELETE /uploads/{id} -- delete a seed image.
///
/// Deleting an unknown id returns `204 No Content` as well, so clients
/// can retry safely.
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
) -> AppResult<StatusCode> {
    state.service.clear_upload(&upload_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
