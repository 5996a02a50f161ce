//! Caption pipeline error types.

use clipcast_models::ErrorKind;
use thiserror::Error;

pub type CaptionResult<T> = Result<T, CaptionError>;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("transcription provider authentication failed: {0}")]
    AuthFailure(String),

    #[error("transcription timed out waiting for a terminal status")]
    Timeout,

    #[error("transcription provider returned an error: {0}")]
    ProviderError(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CaptionError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CaptionError::Timeout | CaptionError::ProviderError(_) | CaptionError::Network(_)
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptionError::AuthFailure(_) => ErrorKind::CaptionAuthFailure,
            CaptionError::Timeout => ErrorKind::CaptionTimeout,
            CaptionError::ProviderError(_) | CaptionError::Network(_) | CaptionError::Json(_) => {
                ErrorKind::CaptionProviderError
            }
        }
    }
}
