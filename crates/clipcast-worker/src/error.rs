//! Worker pipeline error types. Every stage's error converts into this
//! enum, which in turn maps into `clipcast_scheduler::ProcessingFailure` at
//! the `JobProcessor` boundary via `kind()`.

use clipcast_models::ErrorKind;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// C4: source download or byte-accurate clipping.
    #[error("audio acquisition/clipping failed: {0}")]
    Clip(clipcast_media::MediaError),

    /// C7: final frame+audio mux.
    #[error("mux failed: {0}")]
    Mux(clipcast_media::MediaError),

    #[error("caption pipeline failed: {0}")]
    Caption(#[from] clipcast_captions::CaptionError),

    #[error("frame rendering failed: {0}")]
    Render(#[from] clipcast_render::RenderError),

    #[error("storage error: {0}")]
    Storage(#[from] clipcast_storage::StorageError),

    #[error("artwork fetch failed: {0}")]
    ArtworkFetch(String),

    #[error("job exceeded its wall-clock budget")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkerError::Clip(e) => e.kind(false),
            WorkerError::Mux(e) => e.kind(true),
            WorkerError::Caption(e) => e.kind(),
            WorkerError::Render(_) => ErrorKind::MediaProcessingFatal,
            WorkerError::Storage(_) => ErrorKind::MediaProcessingTransient,
            WorkerError::ArtworkFetch(_) => ErrorKind::SourceTransient5xx,
            WorkerError::Timeout => ErrorKind::Timeout,
            WorkerError::Io(_) => ErrorKind::MediaProcessingTransient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_and_mux_stage_classify_the_same_media_error_differently() {
        let timeout_err = || clipcast_media::MediaError::Timeout(30);
        assert_eq!(WorkerError::Clip(timeout_err()).kind(), ErrorKind::MediaProcessingTransient);
        assert_eq!(WorkerError::Mux(timeout_err()).kind(), ErrorKind::MuxFailed);
    }
}
