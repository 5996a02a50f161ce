//! Job store error types.

use thiserror::Error;

/// Result type for job store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during job store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(job_id: impl Into<String>) -> Self {
        Self::NotFound(job_id.into())
    }

    /// Whether a caller should retry this store operation itself (distinct
    /// from the job-level `ErrorKind` retry the scheduler reasons about).
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Database(e) if matches!(
            e,
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)
        ))
    }
}
