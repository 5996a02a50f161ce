//! C3: admission control, the bounded worker pool, retry/backoff, and
//! crash recovery.

use std::sync::Arc;

use clipcast_models::{AdmissionError, CreateVideoRequest, CreateVideoRequest as Request, Job, JobId, JobStatus};
use clipcast_store::JobStore;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

use crate::admission::{estimate_time_sec, SubmitError, SubmitOutcome};
use crate::budget::DailyBudget;
use crate::config::SchedulerConfig;
use crate::processor::JobProcessor;

/// Full job record plus the live fields `GetStatus` must report.
#[derive(Debug, Clone)]
pub struct JobStatusView {
    pub job: Job,
    pub queue_position: usize,
    pub active_jobs: usize,
}

/// The scheduler. Cheap to clone (everything behind `Arc`); intended to be
/// constructed once in `main` and shared between the HTTP surface and the
/// worker pool.
pub struct JobScheduler {
    store: Arc<dyn JobStore>,
    config: SchedulerConfig,
    budget: DailyBudget,
    semaphore: Arc<Semaphore>,
    processor: Arc<dyn JobProcessor>,
    /// Single critical section around the select-and-assign step of
    /// `pump_queue`, per the shared-resource policy. Never held across a
    /// worker's network/process I/O.
    pump_lock: Mutex<()>,
}

impl JobScheduler {
    pub fn new(store: Arc<dyn JobStore>, config: SchedulerConfig, processor: Arc<dyn JobProcessor>) -> Arc<Self> {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent));
        Arc::new(Self {
            store,
            config,
            budget: DailyBudget::new(),
            semaphore,
            processor,
            pump_lock: Mutex::new(()),
        })
    }

    /// `Submit(request) -> {jobId, estimatedTimeSec, queuePosition}` or an
    /// admission error. Validates, estimates cost, checks the queue and
    /// daily budget, persists as `queued`, and returns immediately -- the
    /// actual work happens on a later `pump_queue`.
    pub async fn submit(self: &Arc<Self>, request: Request) -> Result<SubmitOutcome, SubmitError> {
        if !self.config.enabled {
            return Err(SubmitError::Admission(AdmissionError::FeatureDisabled));
        }

        request.validate().map_err(SubmitError::Admission)?;

        let queued = self.store.get_by_status(JobStatus::Queued).await?;
        if queued.len() >= self.config.max_queue_size {
            return Err(SubmitError::Admission(AdmissionError::QueueFull));
        }

        let duration_ms = request.clip_end - request.clip_start;
        let estimate = self
            .config
            .cost
            .estimate(duration_ms, request.captions_enabled, request.enable_smart_features);

        if !self.budget.try_admit(estimate, self.config.daily_spend_cap).await {
            return Err(SubmitError::Admission(AdmissionError::BudgetExceeded));
        }

        let estimated_time_sec = estimate_time_sec(duration_ms);
        let job = Job::new(request, estimate, estimated_time_sec);
        let job_id = job.id.clone();
        self.store.create(&job).await?;

        let queue_position = queued.len();

        info!(job_id = %job_id, estimate, estimated_time_sec, queue_position, "admitted job");

        self.pump_queue().await;

        Ok(SubmitOutcome { job_id, estimated_time_sec, queue_position })
    }

    /// `GetStatus(jobId)`: the full job record plus live `queuePosition` (0
    /// if not queued) and `activeJobs`.
    pub async fn get_status(&self, job_id: &JobId) -> Result<Option<JobStatusView>, clipcast_store::StoreError> {
        let Some(job) = self.store.get(job_id).await? else {
            return Ok(None);
        };

        let active_jobs = self.store.get_by_status(JobStatus::Processing).await?.len();
        let queue_position = if job.status == JobStatus::Queued {
            self.store
                .get_by_status(JobStatus::Queued)
                .await?
                .iter()
                .filter(|j| j.created_at < job.created_at)
                .count()
        } else {
            0
        };

        Ok(Some(JobStatusView { job, queue_position, active_jobs }))
    }

    /// Crash recovery: demote every `processing` job back to `queued` (a
    /// worker was killed mid-run; all outputs are content-derived, so
    /// redoing the work is cheap), then pump. Called once at startup.
    pub async fn recover(self: &Arc<Self>) -> Result<(), clipcast_store::StoreError> {
        let stuck = self.store.get_by_status(JobStatus::Processing).await?;
        for mut job in stuck {
            warn!(job_id = %job.id, "demoting crashed in-flight job back to queued");
            job.demote_for_crash_recovery();
            self.store.update(&job).await?;
        }
        self.pump_queue().await;
        Ok(())
    }

    /// While free worker slots exist, claim the oldest queued job and hand
    /// it to a worker task. Called after every submit, after every worker
    /// completion, and once at startup.
    pub async fn pump_queue(self: &Arc<Self>) {
        let _guard = self.pump_lock.lock().await;
        loop {
            let permit = match Arc::clone(&self.semaphore).try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let queued = match self.store.get_by_status(JobStatus::Queued).await {
                Ok(jobs) => jobs,
                Err(e) => {
                    error!(error = %e, "failed to read queued jobs during pump_queue");
                    break;
                }
            };

            let Some(mut job) = queued.into_iter().min_by_key(|j| j.created_at) else {
                break;
            };

            job.start_processing();
            if let Err(e) = self.store.update(&job).await {
                error!(job_id = %job.id, error = %e, "failed to persist processing transition");
                break;
            }

            let this = Arc::clone(self);
            tokio::spawn(async move {
                this.run_worker(job, permit).await;
            });
        }
    }

    async fn run_worker(self: Arc<Self>, mut job: Job, permit: tokio::sync::OwnedSemaphorePermit) {
        let job_id = job.id.clone();
        info!(job_id = %job_id, "worker picked up job");

        match self.processor.process(&job).await {
            Ok(result) => {
                self.budget.record_realized(result.cost_breakdown.total()).await;
                job.complete(result);
                if let Err(e) = self.store.update(&job).await {
                    error!(job_id = %job_id, error = %e, "failed to persist completed job");
                }
                info!(job_id = %job_id, "job completed");
            }
            Err(failure) => {
                if failure.kind.is_retryable() && job.can_retry() {
                    warn!(job_id = %job_id, kind = %failure.kind, retries = job.retries, "retriable failure, requeueing");
                    job.retry();
                } else {
                    error!(job_id = %job_id, kind = %failure.kind, "terminal failure");
                    job.fail(format!("{}: {}", failure.kind, failure.message));
                }
                if let Err(e) = self.store.update(&job).await {
                    error!(job_id = %job_id, error = %e, "failed to persist job failure/retry");
                }
            }
        }

        drop(permit);
        self.pump_queue().await;
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Today's admitted spend so far, for the `today_spend_usd` metrics gauge.
    pub async fn spent_today(&self) -> f64 {
        self.budget.spent_today().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clipcast_models::{CaptionStyle, CostBreakdown, ErrorKind, JobResult, PodcastMetadata};
    use clipcast_store::InMemoryJobStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn request() -> CreateVideoRequest {
        CreateVideoRequest {
            audio_url: "https://example.test/ep.mp3".to_string(),
            clip_start: 0,
            clip_end: 30_000,
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

    fn fake_result() -> JobResult {
        JobResult {
            video_url: "/api/download-video/x".to_string(),
            download_url: "/api/download-video/x".to_string(),
            file_size_bytes: 1024,
            duration_sec: 30.0,
            processing_time_ms: 10,
            cost_breakdown: CostBreakdown::default(),
        }
    }

    struct AlwaysSucceeds {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl JobProcessor for AlwaysSucceeds {
        async fn process(&self, _job: &Job) -> Result<JobResult, crate::error::ProcessingFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(fake_result())
        }
    }

    struct AlwaysFailsRetriable {
        kind: ErrorKind,
    }

    #[async_trait]
    impl JobProcessor for AlwaysFailsRetriable {
        async fn process(&self, _job: &Job) -> Result<JobResult, crate::error::ProcessingFailure> {
            Err(crate::error::ProcessingFailure::new(self.kind, "boom"))
        }
    }

    #[tokio::test]
    async fn submit_returns_job_id_and_eventually_completes() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let processor = Arc::new(AlwaysSucceeds { calls: AtomicUsize::new(0), delay: Duration::from_millis(5) });
        let scheduler = JobScheduler::new(store.clone(), SchedulerConfig::default(), processor);

        let outcome = scheduler.submit(request()).await.unwrap();
        assert_eq!(outcome.queue_position, 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let status = scheduler.get_status(&outcome.job_id).await.unwrap().unwrap();
        assert_eq!(status.job.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn feature_disabled_rejects_before_touching_the_store() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let processor = Arc::new(AlwaysSucceeds { calls: AtomicUsize::new(0), delay: Duration::from_millis(1) });
        let mut config = SchedulerConfig::default();
        config.enabled = false;
        let scheduler = JobScheduler::new(store, config, processor);

        let err = scheduler.submit(request()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Admission(AdmissionError::FeatureDisabled)));
    }

    #[tokio::test]
    async fn budget_exceeded_rejects_admission() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let processor = Arc::new(AlwaysSucceeds { calls: AtomicUsize::new(0), delay: Duration::from_millis(1) });
        let mut config = SchedulerConfig::default();
        config.daily_spend_cap = 0.0000001;
        let scheduler = JobScheduler::new(store, config, processor);

        let err = scheduler.submit(request()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Admission(AdmissionError::BudgetExceeded)));
    }

    #[tokio::test]
    async fn queue_full_rejects_admission() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        // A processor that never completes, so slots stay occupied and the
        // queue backs up behind `max_concurrent`.
        let processor = Arc::new(AlwaysSucceeds { calls: AtomicUsize::new(0), delay: Duration::from_secs(30) });
        let mut config = SchedulerConfig::default();
        config.max_queue_size = 1;
        config.max_concurrent = 1;
        let scheduler = JobScheduler::new(store, config, processor);

        scheduler.submit(request()).await.unwrap(); // picked up by the one worker slot immediately
        scheduler.submit(request()).await.unwrap(); // fills the queue (size 1)
        let err = scheduler.submit(request()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Admission(AdmissionError::QueueFull)));
    }

    #[tokio::test]
    async fn retriable_failure_requeues_until_retries_exhausted() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let processor = Arc::new(AlwaysFailsRetriable { kind: ErrorKind::SourceTransient5xx });
        let scheduler = JobScheduler::new(store, SchedulerConfig::default(), processor);

        let outcome = scheduler.submit(request()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let status = scheduler.get_status(&outcome.job_id).await.unwrap().unwrap();
        assert_eq!(status.job.status, JobStatus::Failed);
        assert_eq!(status.job.retries, status.job.max_retries);
    }

    #[tokio::test]
    async fn non_retriable_failure_fails_immediately_without_retry() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let processor = Arc::new(AlwaysFailsRetriable { kind: ErrorKind::SourceUnavailable4xx });
        let scheduler = JobScheduler::new(store, SchedulerConfig::default(), processor);

        let outcome = scheduler.submit(request()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let status = scheduler.get_status(&outcome.job_id).await.unwrap().unwrap();
        assert_eq!(status.job.status, JobStatus::Failed);
        assert_eq!(status.job.retries, 0);
    }

    #[tokio::test]
    async fn recover_demotes_processing_jobs_without_incrementing_retries() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let mut job = Job::new(request(), 0.01, 20);
        job.start_processing();
        store.create(&job).await.unwrap();

        let processor = Arc::new(AlwaysSucceeds { calls: AtomicUsize::new(0), delay: Duration::from_millis(1) });
        let scheduler = JobScheduler::new(store.clone(), SchedulerConfig::default(), processor);
        scheduler.recover().await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        let recovered = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(recovered.status, JobStatus::Completed);
        assert_eq!(recovered.retries, 0);
    }

    #[tokio::test]
    async fn concurrency_cap_is_never_exceeded() {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let processor = Arc::new(AlwaysSucceeds { calls: AtomicUsize::new(0), delay: Duration::from_millis(40) });
        let mut config = SchedulerConfig::default();
        config.max_concurrent = 2;
        config.max_queue_size = 10;
        let scheduler = JobScheduler::new(store.clone(), config, processor);

        for _ in 0..5 {
            scheduler.submit(request()).await.unwrap();
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        let processing = store.get_by_status(JobStatus::Processing).await.unwrap();
        assert!(processing.len() <= 2);
    }
}
