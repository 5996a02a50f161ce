//! The `JobStore` trait: durable persistence for jobs, plus the queries the
//! scheduler and HTTP surface need.

use async_trait::async_trait;
use clipcast_models::{Job, JobId, JobStatus};

use crate::error::StoreResult;

/// Durable persistence for jobs. Implementations must make `create` and
/// `update` visible to `get`/`get_by_status` issued from any worker, since
/// the scheduler's crash-recovery sweep reads whatever the previous process
/// last wrote.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: &Job) -> StoreResult<()>;

    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>>;

    async fn get_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>>;

    /// Persist the full current state of `job`, keyed by `job.id`.
    async fn update(&self, job: &Job) -> StoreResult<()>;
}
