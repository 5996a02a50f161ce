//! Notifier error types. Never propagated to the scheduler -- every call
//! site logs and swallows these via `tracing::warn!`.

use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier not configured")]
    NotConfigured,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    ProviderError { status: u16, body: String },
}
