//! Transcription provider HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{CaptionError, CaptionResult};
use crate::types::{CreateTranscriptRequest, CreateTranscriptResponse, PollTranscriptResponse, UploadResponse};

/// Configuration for the transcription provider client.
#[derive(Debug, Clone)]
pub struct TranscriptionClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl TranscriptionClientConfig {
    pub fn from_env() -> CaptionResult<Self> {
        let api_key = std::env::var("ASSEMBLYAI_API_KEY")
            .map_err(|_| CaptionError::AuthFailure("ASSEMBLYAI_API_KEY not set".to_string()))?;
        Ok(Self {
            base_url: std::env::var("TRANSCRIPTION_BASE_URL")
                .unwrap_or_else(|_| "https://api.assemblyai.com/v2".to_string()),
            api_key,
            timeout: Duration::from_secs(60),
        })
    }
}

/// Small client for the transcription provider: upload, create, poll, as
/// separate methods so the bounded polling loop lives at the call site.
#[derive(Clone)]
pub struct TranscriptionClient {
    http: Client,
    config: TranscriptionClientConfig,
}

impl TranscriptionClient {
    pub fn new(config: TranscriptionClientConfig) -> CaptionResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> CaptionResult<Self> {
        Self::new(TranscriptionClientConfig::from_env()?)
    }

    /// Upload the clipped audio file produced by the clipper, returning a
    /// provider-side URL referring to the uploaded blob.
    pub async fn upload(&self, audio_path: impl AsRef<Path>) -> CaptionResult<String> {
        let bytes = tokio::fs::read(audio_path.as_ref()).await.map_err(|e| {
            CaptionError::ProviderError(format!("failed to read clipped audio for upload: {e}"))
        })?;

        let url = format!("{}/upload", self.config.base_url);
        let response = self
            .http
            .post(&url)
            .header("authorization", &self.config.api_key)
            .body(bytes)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: UploadResponse = response.json().await?;
        debug!("uploaded clipped audio, provider url: {}", body.upload_url);
        Ok(body.upload_url)
    }

    /// Create a transcription job for the uploaded audio.
    pub async fn create_transcript(&self, upload_url: &str, enable_smart_features: bool) -> CaptionResult<String> {
        let request = CreateTranscriptRequest::new(upload_url.to_string(), enable_smart_features);
        let url = format!("{}/transcript", self.config.base_url);

        let response = self
            .http
            .post(&url)
            .header("authorization", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: CreateTranscriptResponse = response.json().await?;
        Ok(body.id)
    }

    /// Poll once for a transcript's current state. Callers loop this on a
    /// bounded schedule (see `pipeline::run_caption_pipeline`).
    pub async fn poll_transcript(&self, transcript_id: &str) -> CaptionResult<PollTranscriptResponse> {
        let url = format!("{}/transcript/{}", self.config.base_url, transcript_id);

        let response = self
            .http
            .get(&url)
            .header("authorization", &self.config.api_key)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> CaptionResult<reqwest::Response> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(CaptionError::AuthFailure(format!("provider returned {status}")));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CaptionError::ProviderError(format!("provider returned {status}: {body}")));
    }
    Ok(response)
}
