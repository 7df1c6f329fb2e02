//! Handlers for the `/stories` resource.
//!
//! A story job is created by `POST /stories` and then polled via
//! `GET /stories/{id}` until its `status` turns terminal. Once stage 1
//! has completed, `POST /stories/{id}/animate` starts the deferred
//! animation pass, tracked separately via `processing_status`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use storyreel_core::job::Job;
use storyreel_core::submission::StorySubmission;
use storyreel_core::types::JobId;
use storyreel_core::video_model::VideoModel;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Optional body for `POST /stories/{id}/animate`.
#[derive(Debug, Default, Deserialize)]
pub struct AnimateRequest {
    /// Animation model name; overrides the model chosen at submission.
    #[serde(default)]
    pub video_model: Option<String>,
}

/// POST /stories -- validate the submission and start stage 1.
///
/// Returns `201 Created` with the initial job snapshot; the client polls
/// `GET /stories/{id}` for progress.
pub async fn submit_story(
    State(state): State<AppState>,
    Json(submission): Json<StorySubmission>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    let job = state.service.submit(submission).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /stories -- list all jobs in ascending id order.
pub async fn list_stories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let jobs = state.service.list().await;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /stories/{id} -- poll one job.
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = state.service.get(id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// POST /stories/{id}/animate -- trigger the stage-2 animation pass.
///
/// Returns `202 Accepted` with the claimed job snapshot, `409 Conflict`
/// when stage 1 has not completed or a run is already in flight or done.
pub async fn animate_story(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
    payload: Option<Json<AnimateRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let model = request
        .video_model
        .as_deref()
        .map(VideoModel::parse)
        .transpose()
        .map_err(AppError::Core)?;

    let job = state.service.trigger_stage2(id, model).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}
