//! In-memory `JobStore`, used when `DATABASE_URL` is unset. Jobs do not
//! survive a process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use clipcast_models::{Job, JobId, JobStatus};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::job_store::JobStore;

#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: &Job) -> StoreResult<()> {
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(job_id).cloned())
    }

    async fn get_by_status(&self, status: JobStatus) -> StoreResult<Vec<Job>> {
        Ok(self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.status == status)
            .cloned()
            .collect())
    }

    async fn update(&self, job: &Job) -> StoreResult<()> {
        let mut jobs = self.jobs.write().await;
        if !jobs.contains_key(&job.id) {
            return Err(StoreError::not_found(job.id.as_str()));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcast_models::{CaptionStyle, CreateVideoRequest, PodcastMetadata};

    fn sample_job() -> Job {
        Job::new(
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
            },
            0.01,
            20,
        )
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = InMemoryJobStore::new();
        let job = sample_job();
        store.create(&job).await.unwrap();
        let fetched = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, job.id);
    }

    #[tokio::test]
    async fn get_by_status_filters_correctly() {
        let store = InMemoryJobStore::new();
        let mut job = sample_job();
        store.create(&job).await.unwrap();
        job.start_processing();
        store.update(&job).await.unwrap();

        let queued = store.get_by_status(JobStatus::Queued).await.unwrap();
        let processing = store.get_by_status(JobStatus::Processing).await.unwrap();
        assert!(queued.is_empty());
        assert_eq!(processing.len(), 1);
    }

    #[tokio::test]
    async fn update_on_unknown_job_errors() {
        let store = InMemoryJobStore::new();
        let job = sample_job();
        assert!(store.update(&job).await.is_err());
    }
}
