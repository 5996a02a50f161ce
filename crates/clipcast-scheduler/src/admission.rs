//! Admission contract types: `Submit` outcomes and error kinds.

use clipcast_models::{AdmissionError, JobId};
use clipcast_store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub job_id: JobId,
    pub estimated_time_sec: u32,
    pub queue_position: usize,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("admission rejected: {0}")]
    Admission(#[from] AdmissionError),
    #[error("job store error: {0}")]
    Store(#[from] StoreError),
}

/// Crude time estimate: a flat per-job overhead (download + mux startup)
/// plus the clip duration itself, since rendering/muxing run roughly in
/// proportion to the clip length at the fixed 12 fps canvas.
pub fn estimate_time_sec(clip_duration_ms: i64) -> u32 {
    const FLAT_OVERHEAD_SEC: f64 = 15.0;
    const DURATION_FACTOR: f64 = 1.2;
    let duration_sec = clip_duration_ms as f64 / 1000.0;
    (FLAT_OVERHEAD_SEC + duration_sec * DURATION_FACTOR).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_duration() {
        let short = estimate_time_sec(10_000);
        let long = estimate_time_sec(200_000);
        assert!(long > short);
    }
}
