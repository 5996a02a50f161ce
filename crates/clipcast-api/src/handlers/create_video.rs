//! `POST /api/create-video` -- submit a clip for rendering.

use axum::extract::State;
use axum::Json;
use clipcast_models::{AdmissionError, CreateVideoRequest};
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::security::{self, UrlValidationResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateVideoResponse {
    pub success: bool,
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: u32,
    pub message: String,
}

/// `POST /api/create-video`.
///
/// Validates the request shape (`CreateVideoRequest::validate`), then
/// additionally SSRF-checks the two URLs the pipeline itself fetches
/// (`audioUrl`, `podcast.artwork`) before admission, since those checks
/// belong to the API boundary rather than the scheduler's admission gate.
pub async fn create_video(
    State(state): State<AppState>,
    Json(request): Json<CreateVideoRequest>,
) -> ApiResult<Json<CreateVideoResponse>> {
    for url in [request.audio_url.as_str(), request.podcast.artwork.as_str()] {
        if let UrlValidationResult::Invalid(_) | UrlValidationResult::Blocked(_) | UrlValidationResult::TooLong =
            security::validate_fetch_url(url)
        {
            return Err(ApiError::Admission(AdmissionError::InvalidRequest));
        }
    }

    let outcome = state.scheduler.submit(request).await?;

    info!(job_id = %outcome.job_id, estimated_time_sec = outcome.estimated_time_sec, "accepted video request");

    Ok(Json(CreateVideoResponse {
        success: true,
        job_id: outcome.job_id.to_string(),
        estimated_time: outcome.estimated_time_sec,
        message: "video queued for rendering".to_string(),
    }))
}
