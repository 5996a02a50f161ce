//! Operational endpoints: liveness and readiness.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// `GET /health` and `GET /healthz` -- liveness, always 200 once the listener is up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub job_store: CheckStatus,
    pub crash_recovery: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn ok() -> Self {
        Self { status: "ok".to_string(), error: None }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self { status: "error".to_string(), error: Some(msg.into()) }
    }
}

/// `GET /ready` -- 200 only once the Job Store has answered a ping and the
/// scheduler's crash-recovery pass has completed (§6.1a).
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let job_store = match state.store.get_by_status(clipcast_models::JobStatus::Queued).await {
        Ok(_) => CheckStatus::ok(),
        Err(e) => CheckStatus::error(e.to_string()),
    };

    let crash_recovery = if state.is_recovered() {
        CheckStatus::ok()
    } else {
        CheckStatus::error("crash recovery has not completed its first pass yet")
    };

    let all_ok = job_store.status == "ok" && crash_recovery.status == "ok";
    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "not_ready" }.to_string(),
        checks: ReadinessChecks { job_store, crash_recovery },
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
