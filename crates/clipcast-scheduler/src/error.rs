//! Scheduler-facing error types.

use clipcast_models::ErrorKind;
use thiserror::Error;

/// What a `JobProcessor` reports back to the scheduler for one job attempt.
/// The scheduler only ever reasons about `kind` (retry vs. terminal) and
/// carries `message` through to the job record's `error` field.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ProcessingFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl ProcessingFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}
