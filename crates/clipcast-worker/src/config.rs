//! Worker pipeline configuration (C4-C8 knobs, distinct from C3's
//! `SchedulerConfig`).

use std::time::Duration;

use clipcast_models::EncodingConfig;

/// Configuration for one job's C4->C5->C6->C7->C8 pipeline run.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// FFmpeg/video encoding parameters for the clipped audio and the final mux.
    pub encoding: EncodingConfig,
    /// Wall-clock multiplier applied to clip duration to bound the whole
    /// pipeline run; a job exceeding it fails with a non-retriable `Timeout`.
    pub job_timeout_multiplier: f64,
    /// Per-call timeouts, matching the documented contract in the
    /// concurrency/resource model.
    pub download_timeout: Duration,
    pub artwork_fetch_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingConfig::default(),
            job_timeout_multiplier: 5.0,
            download_timeout: Duration::from_secs(60),
            artwork_fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            encoding: EncodingConfig::default(),
            job_timeout_multiplier: std::env::var("JOB_TIMEOUT_MULTIPLIER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.job_timeout_multiplier),
            download_timeout: Duration::from_secs(
                std::env::var("DOWNLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            artwork_fetch_timeout: Duration::from_secs(
                std::env::var("ARTWORK_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }

    /// Overall wall-clock budget for a clip of `clip_duration_ms`.
    pub fn job_timeout(&self, clip_duration_ms: i64) -> Duration {
        let secs = (clip_duration_ms as f64 / 1000.0) * self.job_timeout_multiplier;
        Duration::from_secs_f64(secs.max(30.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_timeout_scales_with_clip_duration() {
        let config = WorkerConfig::default();
        let short = config.job_timeout(10_000);
        let long = config.job_timeout(200_000);
        assert!(long > short);
    }

    #[test]
    fn job_timeout_has_a_floor_for_tiny_clips() {
        let config = WorkerConfig::default();
        assert_eq!(config.job_timeout(1_000), Duration::from_secs_f64(30.0));
    }
}
