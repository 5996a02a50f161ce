//! `GET /api/download-video/{jobId}`.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::{ApiError, ApiResult};
use crate::security::is_valid_job_id;
use crate::state::AppState;

pub async fn download_video(State(state): State<AppState>, Path(job_id): Path<String>) -> ApiResult<Response> {
    if !is_valid_job_id(&job_id) {
        return Err(ApiError::bad_request("invalid job id format"));
    }

    if !state.storage.video_exists(&job_id).await {
        return Err(ApiError::not_found("video not found or expired"));
    }

    let bytes = state.storage.read_video(&job_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "video/mp4"),
            (header::CONTENT_DISPOSITION, "inline"),
        ],
        bytes,
    )
        .into_response())
}
