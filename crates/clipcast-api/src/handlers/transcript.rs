//! `POST /api/transcript` and `GET /api/transcript/{id}` -- thin proxies to
//! the transcription provider, for the client's legacy on-device caption
//! path. Forwards the provider's JSON verbatim; only the status code is
//! reclassified per §6.1 (`401/403 -> 502`, `429 -> 429` with `retryAfterSec`,
//! `5xx -> 504`).

use axum::extract::{Path, State};
use axum::Json;
use reqwest::StatusCode as ReqStatus;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const DEFAULT_RETRY_AFTER_SEC: u64 = 5;

pub async fn post_transcript(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> ApiResult<Json<serde_json::Value>> {
    let config = state
        .transcription
        .as_ref()
        .ok_or_else(|| ApiError::ProxyUnavailable("transcription provider is not configured".to_string()))?;

    let url = format!("{}/transcript", config.base_url);
    let response = state
        .transcription_http
        .post(&url)
        .header("authorization", &config.api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::ProxyUnavailable(e.to_string()))?;

    forward(response).await
}

pub async fn get_transcript(State(state): State<AppState>, Path(transcript_id): Path<String>) -> ApiResult<Json<serde_json::Value>> {
    let config = state
        .transcription
        .as_ref()
        .ok_or_else(|| ApiError::ProxyUnavailable("transcription provider is not configured".to_string()))?;

    let url = format!("{}/transcript/{}", config.base_url, transcript_id);
    let response = state
        .transcription_http
        .get(&url)
        .header("authorization", &config.api_key)
        .send()
        .await
        .map_err(|e| ApiError::ProxyUnavailable(e.to_string()))?;

    forward(response).await
}

async fn forward(response: reqwest::Response) -> ApiResult<Json<serde_json::Value>> {
    let status = response.status();

    if status == ReqStatus::UNAUTHORIZED || status == ReqStatus::FORBIDDEN {
        return Err(ApiError::Proxy(format!("provider returned {status}")));
    }
    if status == ReqStatus::TOO_MANY_REQUESTS {
        let retry_after_sec = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SEC);
        return Err(ApiError::ProxyRateLimited { retry_after_sec });
    }
    if status.is_server_error() {
        return Err(ApiError::ProxyUnavailable(format!("provider returned {status}")));
    }

    let body = response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ApiError::Proxy(format!("provider returned malformed JSON: {e}")))?;
    Ok(Json(body))
}
