//! Postgres-backed `JobStore`, used when `DATABASE_URL` is set.

use async_trait::async_trait;
use clipcast_models::{Job, JobId, JobStatus};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::job_store::JobStore;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("migrations");

/// A durable job store backed by a Postgres connection pool.
///
/// Every mutation is written straight through to the `jobs` table; there is
/// no write-behind cache, since job writes are infrequent relative to the
/// media-processing work they bracket.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    /// Connect to `database_url`, running embedded migrations before the
    /// store is considered ready.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
        MIGRATOR.run(&pool).await?;
        info!("connected to job store database and applied migrations");
        Ok(Self { pool })
    }

    fn row_to_job(data: serde_json::Value) -> StoreResult<Job> {
        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create(&self, job: &Job) -> StoreResult<()> {
        let data = serde_json::to_value(job)?;
        sqlx::query("INSERT INTO jobs (id, status, data, created_at) VALUES ($1, $2, $3, $4)")
            .bind(job.id.as_str())
            .bind(job.status.as_str())
            .bind(&data)
            .bind(job.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as("SELECT data FROM jobs WHERE id = $1")
            .bind(job_id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(data,)| Self::row_to_job(data)).transpose()
    }

    async fn get_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        let rows: Vec<(serde_json::Value,)> = sqlx::query_as("SELECT data FROM jobs WHERE status = $1 ORDER BY created_at")
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|(data,)| Self::row_to_job(data)).collect()
    }

    async fn update(&self, job: &Job) -> StoreResult<()> {
        let data = serde_json::to_value(job)?;
        let result = sqlx::query("UPDATE jobs SET status = $2, data = $3 WHERE id = $1")
            .bind(job.id.as_str())
            .bind(job.status.as_str())
            .bind(&data)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(job.id.as_str()));
        }
        Ok(())
    }
}
