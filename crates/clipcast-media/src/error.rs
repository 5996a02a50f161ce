//! Error types for media operations: acquisition, clipping, and muxing.

use std::path::PathBuf;
use thiserror::Error;

use clipcast_models::ErrorKind;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media acquisition, clipping, or muxing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed { message: String, stderr: Option<String> },

    #[error("source returned HTTP {status}")]
    SourceHttpStatus { status: u16 },

    #[error("source download failed: {message}")]
    DownloadFailed { message: String },

    #[error("source download timed out")]
    DownloadTimeout,

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("invalid video file: {0}")]
    InvalidVideo(String),

    #[error("mux output failed validation: {0}")]
    OutputInvalid(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(message: impl Into<String>, stderr: Option<String>, exit_code: Option<i32>) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed { message: message.into() }
    }

    /// Classify an HTTP response status observed during the source-download step.
    pub fn from_download_status(status: u16) -> Self {
        Self::SourceHttpStatus { status }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Map this error into the cross-crate error-kind taxonomy.
    ///
    /// `is_mux_stage` distinguishes a C7 (mux) failure from a C4 (clip) failure,
    /// since both stages share `FfmpegFailed`/`Timeout` variants but map to
    /// different kinds (`MediaProcessing*` vs `MuxFailed`/`OutputInvalid`).
    pub fn kind(&self, is_mux_stage: bool) -> ErrorKind {
        match self {
            MediaError::SourceHttpStatus { status } if (400..500).contains(status) => ErrorKind::SourceUnavailable4xx,
            MediaError::SourceHttpStatus { .. } => ErrorKind::SourceTransient5xx,
            MediaError::DownloadFailed { .. } => ErrorKind::SourceTransient5xx,
            MediaError::DownloadTimeout => ErrorKind::SourceTimeout,
            MediaError::OutputInvalid(_) => ErrorKind::OutputInvalid,
            MediaError::Timeout(_) if is_mux_stage => ErrorKind::MuxFailed,
            MediaError::Timeout(_) => ErrorKind::MediaProcessingTransient,
            MediaError::FfmpegFailed { stderr, .. } => {
                let transient = stderr.as_deref().map(is_transient_ffmpeg_stderr).unwrap_or(false);
                if is_mux_stage {
                    ErrorKind::MuxFailed
                } else if transient {
                    ErrorKind::MediaProcessingTransient
                } else {
                    ErrorKind::MediaProcessingFatal
                }
            }
            MediaError::FfmpegNotFound | MediaError::FfprobeNotFound => ErrorKind::MediaProcessingFatal,
            MediaError::Cancelled => ErrorKind::MediaProcessingFatal,
            MediaError::Io(_) | MediaError::JsonParse(_) | MediaError::FfprobeFailed { .. } | MediaError::InvalidVideo(_) => {
                if is_mux_stage {
                    ErrorKind::OutputInvalid
                } else {
                    ErrorKind::MediaProcessingTransient
                }
            }
            MediaError::Internal(_) => ErrorKind::MediaProcessingFatal,
        }
    }
}

/// Transient FFmpeg stderr patterns worth a retry rather than a fatal classification.
fn is_transient_ffmpeg_stderr(stderr: &str) -> bool {
    const TRANSIENT_PATTERNS: &[&str] = &[
        "Connection reset",
        "Connection timed out",
        "Resource temporarily unavailable",
        "Broken pipe",
        "End of file",
        "Input/output error",
    ];
    TRANSIENT_PATTERNS.iter().any(|p| stderr.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_4xx_is_non_retriable() {
        let err = MediaError::from_download_status(404);
        assert_eq!(err.kind(false), ErrorKind::SourceUnavailable4xx);
        assert!(!err.kind(false).is_retryable());
    }

    #[test]
    fn source_5xx_is_retriable() {
        let err = MediaError::from_download_status(503);
        assert_eq!(err.kind(false), ErrorKind::SourceTransient5xx);
        assert!(err.kind(false).is_retryable());
    }

    #[test]
    fn transient_ffmpeg_stderr_is_retriable_at_clip_stage() {
        let err = MediaError::ffmpeg_failed("exit 1", Some("Connection reset by peer".to_string()), Some(1));
        assert_eq!(err.kind(false), ErrorKind::MediaProcessingTransient);
    }

    #[test]
    fn unrecognized_ffmpeg_stderr_is_fatal_at_clip_stage() {
        let err = MediaError::ffmpeg_failed("exit 1", Some("Invalid data found".to_string()), Some(1));
        assert_eq!(err.kind(false), ErrorKind::MediaProcessingFatal);
    }

    #[test]
    fn ffmpeg_failure_at_mux_stage_is_mux_failed() {
        let err = MediaError::ffmpeg_failed("exit 1", Some("Invalid data found".to_string()), Some(1));
        assert_eq!(err.kind(true), ErrorKind::MuxFailed);
    }
}
