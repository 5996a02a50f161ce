//! The seam between C3 (scheduling) and the C4-C8 pipeline. The scheduler
//! only ever drives a `JobProcessor`; it never depends on the acquisition,
//! caption, rendering, or muxing crates directly, keeping the worker pool's
//! admission/retry/recovery logic testable without real FFmpeg/network I/O.

use async_trait::async_trait;
use clipcast_models::{Job, JobResult};

use crate::error::ProcessingFailure;

/// Runs one job end-to-end: C4 -> C5 (optional) -> C6 -> C7, then
/// whatever C8 notification the implementation wants to fire. Implemented by
/// `clipcast-worker`.
#[async_trait]
pub trait JobProcessor: Send + Sync {
    async fn process(&self, job: &Job) -> Result<JobResult, ProcessingFailure>;
}
