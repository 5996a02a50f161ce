//! `GET /api/video-status/{jobId}`.

use axum::extract::{Path, State};
use axum::Json;
use clipcast_models::{Job, JobId};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::security::is_valid_job_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VideoStatusResponse {
    #[serde(flatten)]
    pub job: Job,
    #[serde(rename = "queuePosition")]
    pub queue_position: usize,
    #[serde(rename = "activeJobs")]
    pub active_jobs: usize,
}

pub async fn video_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<VideoStatusResponse>> {
    if !is_valid_job_id(&job_id) {
        return Err(ApiError::bad_request("invalid job id format"));
    }

    let status = state
        .scheduler
        .get_status(&JobId::from_string(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found("job not found"))?;

    Ok(Json(VideoStatusResponse {
        job: status.job,
        queue_position: status.queue_position,
        active_jobs: status.active_jobs,
    }))
}
