//! Application state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clipcast_captions::TranscriptionClientConfig;
use clipcast_scheduler::JobScheduler;
use clipcast_storage::LocalVideoStorage;
use clipcast_store::JobStore;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub scheduler: Arc<JobScheduler>,
    pub store: Arc<dyn JobStore>,
    pub storage: LocalVideoStorage,
    /// Credentials for the `/api/transcript` proxy (§6.1, legacy on-device
    /// caption path). `None` when `ASSEMBLYAI_API_KEY` isn't set -- the
    /// proxy endpoints then answer 502.
    pub transcription: Option<TranscriptionClientConfig>,
    pub transcription_http: reqwest::Client,
    /// Flips once the scheduler's crash-recovery pass has completed, gating `/ready`.
    pub recovered: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        scheduler: Arc<JobScheduler>,
        store: Arc<dyn JobStore>,
        storage: LocalVideoStorage,
    ) -> Self {
        let transcription = TranscriptionClientConfig::from_env().ok();
        Self {
            config,
            scheduler,
            store,
            storage,
            transcription,
            transcription_http: reqwest::Client::new(),
            recovered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn mark_recovered(&self) {
        self.recovered.store(true, Ordering::SeqCst);
    }

    pub fn is_recovered(&self) -> bool {
        self.recovered.load(Ordering::SeqCst)
    }
}
