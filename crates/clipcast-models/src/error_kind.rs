//! The error taxonomy a worker reports to the scheduler: kinds, not type names.
//!
//! Every crate's own error enum (`MediaError`, `CaptionError`, ...) carries
//! enough information to classify into one of these kinds via `ErrorKind::from`
//! impls in that crate; the scheduler only ever reasons about `ErrorKind`.

use std::fmt;

/// A classified failure kind, used by the scheduler to decide retry vs. terminal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Admission
    FeatureDisabled,
    QueueFull,
    BudgetExceeded,
    InvalidRequest,

    // Source acquisition
    SourceUnavailable4xx,
    SourceTransient5xx,
    SourceTimeout,

    // Media processing
    MediaProcessingTransient,
    MediaProcessingFatal,

    // Captions
    CaptionAuthFailure,
    CaptionTimeout,
    CaptionProviderError,

    // Muxing/validation
    MuxFailed,
    OutputInvalid,

    // Notification
    PushFailed,
    ChatNotifyFailed,

    // Overall job budget
    Timeout,
}

impl ErrorKind {
    /// Whether the scheduler should re-queue the job for another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::SourceTransient5xx
                | ErrorKind::SourceTimeout
                | ErrorKind::MediaProcessingTransient
                | ErrorKind::CaptionTimeout
                | ErrorKind::CaptionProviderError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FeatureDisabled => "FeatureDisabled",
            ErrorKind::QueueFull => "QueueFull",
            ErrorKind::BudgetExceeded => "BudgetExceeded",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::SourceUnavailable4xx => "SourceUnavailable4xx",
            ErrorKind::SourceTransient5xx => "SourceTransient5xx",
            ErrorKind::SourceTimeout => "SourceTimeout",
            ErrorKind::MediaProcessingTransient => "MediaProcessingTransient",
            ErrorKind::MediaProcessingFatal => "MediaProcessingFatal",
            ErrorKind::CaptionAuthFailure => "CaptionAuthFailure",
            ErrorKind::CaptionTimeout => "CaptionTimeout",
            ErrorKind::CaptionProviderError => "CaptionProviderError",
            ErrorKind::MuxFailed => "MuxFailed",
            ErrorKind::OutputInvalid => "OutputInvalid",
            ErrorKind::PushFailed => "PushFailed",
            ErrorKind::ChatNotifyFailed => "ChatNotifyFailed",
            ErrorKind::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
