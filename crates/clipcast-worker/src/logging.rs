//! Structured per-job logging: every worker log line is tagged with
//! `jobId` via a `tracing::Span`, per the ambient logging contract.

use clipcast_models::JobId;
use tracing::{error, info, warn, Span};

#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    stage: String,
}

impl JobLogger {
    pub fn new(job_id: &JobId, stage: &str) -> Self {
        Self { job_id: job_id.to_string(), stage: stage.to_string() }
    }

    pub fn log_start(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %self.stage, "stage started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %self.stage, "stage progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(job_id = %self.job_id, stage = %self.stage, "stage warning: {}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(job_id = %self.job_id, stage = %self.stage, "stage error: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(job_id = %self.job_id, stage = %self.stage, "stage completed: {}", message);
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!("job", job_id = %self.job_id, stage = %self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_carries_job_id_and_stage() {
        let job_id = JobId::new();
        let logger = JobLogger::new(&job_id, "clip");
        assert_eq!(logger.job_id, job_id.to_string());
        assert_eq!(logger.stage, "clip");
    }
}
