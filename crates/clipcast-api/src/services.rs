//! Background tasks owned by the API process: the video retention sweep
//! (§6.3a) and the periodic metrics gauge refresh (§6.1a). Both run as
//! plain `tokio::spawn`ed loops, in the spirit of the teacher's stale-job
//! detector.

use std::sync::Arc;
use std::time::Duration;

use clipcast_models::JobStatus;
use clipcast_scheduler::JobScheduler;
use clipcast_storage::LocalVideoStorage;
use clipcast_store::JobStore;
use tracing::{error, info};

use crate::metrics;

/// Sweeps `OUTPUT_DIR` for completed videos older than `VIDEO_RETENTION_HOURS`,
/// once per hour, for as long as the process runs.
pub struct RetentionSweeper {
    storage: LocalVideoStorage,
    max_age: Duration,
    interval: Duration,
}

impl RetentionSweeper {
    pub fn new(storage: LocalVideoStorage) -> Self {
        let retention_hours: u64 = std::env::var("VIDEO_RETENTION_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24);
        Self {
            storage,
            max_age: Duration::from_secs(retention_hours * 3600),
            interval: Duration::from_secs(3600),
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            match self.storage.sweep_expired(self.max_age).await {
                Ok(removed) if removed > 0 => info!(removed, "retention sweep removed expired videos"),
                Ok(_) => {}
                Err(e) => error!(error = %e, "retention sweep failed"),
            }
        }
    }
}

/// Samples the scheduler/store every few seconds and updates the
/// `active_jobs`, `queue_depth`, and `today_spend_usd` gauges (§6.1a).
pub struct GaugeRefresher {
    store: Arc<dyn JobStore>,
    scheduler: Arc<JobScheduler>,
    interval: Duration,
}

impl GaugeRefresher {
    pub fn new(store: Arc<dyn JobStore>, scheduler: Arc<JobScheduler>) -> Self {
        Self { store, scheduler, interval: Duration::from_secs(10) }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;

            match self.store.get_by_status(JobStatus::Processing).await {
                Ok(jobs) => metrics::set_active_jobs(jobs.len()),
                Err(e) => error!(error = %e, "gauge refresh: failed to read active jobs"),
            }

            match self.store.get_by_status(JobStatus::Queued).await {
                Ok(jobs) => metrics::set_queue_depth(jobs.len()),
                Err(e) => error!(error = %e, "gauge refresh: failed to read queue depth"),
            }

            metrics::set_today_spend_usd(self.scheduler.spent_today().await);
        }
    }
}
