//! Job definitions: the central entity of the rendering pipeline.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::cost::CostBreakdown;
use crate::request::CreateVideoRequest;

/// Unique identifier for a job. Opaque, collision-resistant within one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job status. See state machine in the scheduler design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result attached to a job on successful completion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub video_url: String,
    pub download_url: String,
    pub file_size_bytes: u64,
    pub duration_sec: f64,
    pub processing_time_ms: u64,
    pub cost_breakdown: CostBreakdown,
}

/// A video rendering job. Created at admission, mutated only by the scheduler
/// and the worker that owns it, never destroyed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub request: CreateVideoRequest,

    pub estimated_cost: f64,
    pub estimated_time_sec: u32,

    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub retries: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn default_max_retries() -> u32 {
    2
}

impl Job {
    /// Create a new job in `queued` status for the given request and cost estimate.
    pub fn new(request: CreateVideoRequest, estimated_cost: f64, estimated_time_sec: u32) -> Self {
        Self {
            id: JobId::new(),
            status: JobStatus::Queued,
            request,
            estimated_cost,
            estimated_time_sec,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            failed_at: None,
            retries: 0,
            max_retries: default_max_retries(),
            result: None,
            error: None,
        }
    }

    /// Clip duration in milliseconds, per the immutable request.
    pub fn clip_duration_ms(&self) -> i64 {
        self.request.clip_end - self.request.clip_start
    }

    /// Transition `queued -> processing`, claiming a worker slot.
    pub fn start_processing(&mut self) {
        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
    }

    /// Demote `processing -> queued` after a retriable failure. Increments `retries`.
    pub fn retry(&mut self) {
        self.status = JobStatus::Queued;
        self.started_at = None;
        self.retries += 1;
    }

    /// Demote `processing -> queued` on crash recovery, without touching the retry counter.
    pub fn demote_for_crash_recovery(&mut self) {
        self.status = JobStatus::Queued;
        self.started_at = None;
    }

    /// Transition to `completed`, attaching the result.
    pub fn complete(&mut self, result: JobResult) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.result = Some(result);
    }

    /// Transition to terminal `failed`, attaching the error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.failed_at = Some(Utc::now());
        self.error = Some(error.into());
    }

    /// Whether another retry attempt is permitted.
    pub fn can_retry(&self) -> bool {
        self.retries < self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CaptionStyle, PodcastMetadata};

    fn sample_request() -> CreateVideoRequest {
        CreateVideoRequest {
            audio_url: "https://example.test/ep.mp3".to_string(),
            clip_start: 30_000,
            clip_end: 60_000,
            podcast: PodcastMetadata {
                title: "E1".to_string(),
                artwork: "https://example.test/a.png".to_string(),
                podcast_name: "Show".to_string(),
            },
            captions_enabled: false,
            caption_style: CaptionStyle::Normal,
            device_token: None,
            enable_smart_features: false,
        }
    }

    #[test]
    fn new_job_starts_queued() {
        let job = Job::new(sample_request(), 0.01, 45);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.clip_duration_ms(), 30_000);
        assert_eq!(job.retries, 0);
        assert_eq!(job.max_retries, 2);
    }

    #[test]
    fn retry_demotes_and_increments_counter() {
        let mut job = Job::new(sample_request(), 0.01, 45);
        job.start_processing();
        assert_eq!(job.status, JobStatus::Processing);

        job.retry();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.retries, 1);
        assert!(job.can_retry());

        job.retry();
        assert_eq!(job.retries, 2);
        assert!(!job.can_retry());
    }

    #[test]
    fn crash_recovery_demotes_without_incrementing_retries() {
        let mut job = Job::new(sample_request(), 0.01, 45);
        job.start_processing();
        job.demote_for_crash_recovery();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.retries, 0);
    }

    #[test]
    fn fail_sets_error_and_terminal_status() {
        let mut job = Job::new(sample_request(), 0.01, 45);
        job.fail("source unavailable");
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.status.is_terminal());
        assert_eq!(job.error.as_deref(), Some("source unavailable"));
    }
}
