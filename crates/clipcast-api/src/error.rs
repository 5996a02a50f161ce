//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clipcast_models::AdmissionError;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("admission rejected: {0}")]
    Admission(AdmissionError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("rate limited")]
    RateLimited,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("transcription provider error: {0}")]
    Proxy(String),

    #[error("transcription provider rate limited, retry after {retry_after_sec}s")]
    ProxyRateLimited { retry_after_sec: u64 },

    #[error("transcription provider unavailable: {0}")]
    ProxyUnavailable(String),

    #[error("job store error: {0}")]
    Store(#[from] clipcast_store::StoreError),

    #[error("storage error: {0}")]
    Storage(#[from] clipcast_storage::StorageError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Admission(e) => match e {
                AdmissionError::InvalidRequest => StatusCode::BAD_REQUEST,
                AdmissionError::FeatureDisabled | AdmissionError::QueueFull | AdmissionError::BudgetExceeded => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Proxy(_) => StatusCode::BAD_GATEWAY,
            ApiError::ProxyRateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ProxyUnavailable(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) | ApiError::Store(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The wire `code` string documented in §6.1 for admission rejections.
    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Admission(e) => Some(e.code()),
            _ => None,
        }
    }
}

impl From<clipcast_scheduler::SubmitError> for ApiError {
    fn from(e: clipcast_scheduler::SubmitError) -> Self {
        match e {
            clipcast_scheduler::SubmitError::Admission(kind) => ApiError::Admission(kind),
            clipcast_scheduler::SubmitError::Store(e) => ApiError::Store(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "retryAfterSec")]
    retry_after_sec: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Internal(_) | ApiError::Store(_) | ApiError::Storage(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default().to_lowercase() == "production" {
                    "an internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let retry_after_sec = match &self {
            ApiError::ProxyRateLimited { retry_after_sec } => Some(*retry_after_sec),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code().map(|c| c.to_string()),
            retry_after_sec,
        };

        (status, Json(body)).into_response()
    }
}
