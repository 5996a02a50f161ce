//! The bounded caption pipeline: upload -> poll -> chunk.
//!
//! Reframes the provider's event-loop-style async chain as an explicit
//! bounded polling loop with a wall-clock budget, rather than nested
//! callbacks. States: `Uploading`, `Queued`, `Transcribing`, `Completed`,
//! `Error` (mirrors `TranscriptStatus` plus the client-side upload step).
//!
//! Any failure here is recoverable by the caller: per the pipeline contract,
//! exhausting retries demotes to "no captions" rather than failing the job.

use std::path::Path;
use std::time::Duration;

use clipcast_models::{CaptionChunk, CaptionStyle};
use tracing::{debug, info, warn};

use crate::client::TranscriptionClient;
use crate::error::{CaptionError, CaptionResult};
use crate::types::TranscriptStatus;

/// Polling interval and overall wall-clock budget for Step C.
#[derive(Debug, Clone, Copy)]
pub struct CaptionPipelineConfig {
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
}

impl Default for CaptionPipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(120),
        }
    }
}

/// Run the full caption pipeline for one job's clipped audio: upload, create
/// a transcription, poll to a terminal status, then chunk.
///
/// `audio_path` must be the byte-accurate clip produced by the audio
/// clipper, not the original source — timestamps are clip-relative by
/// construction because the upload itself starts at `clipStart`; no
/// subtraction is performed here.
pub async fn run_caption_pipeline(
    client: &TranscriptionClient,
    audio_path: impl AsRef<Path>,
    caption_style: &CaptionStyle,
    enable_smart_features: bool,
    config: CaptionPipelineConfig,
) -> CaptionResult<Vec<CaptionChunk>> {
    debug!("caption pipeline: uploading clipped audio");
    let upload_url = client.upload(audio_path).await?;

    debug!("caption pipeline: creating transcript");
    let transcript_id = client.create_transcript(&upload_url, enable_smart_features).await?;

    let poll = poll_to_terminal(client, &transcript_id, config).await?;

    if poll.status == TranscriptStatus::Error {
        let message = poll.error.unwrap_or_else(|| "unknown provider error".to_string());
        return Err(CaptionError::ProviderError(message));
    }

    info!(
        "caption pipeline: transcript {} completed with {} utterances, {} words",
        transcript_id,
        poll.utterances.len(),
        poll.words.len()
    );

    Ok(crate::chunk::build_caption_chunks(&poll.utterances, &poll.words, caption_style))
}

async fn poll_to_terminal(
    client: &TranscriptionClient,
    transcript_id: &str,
    config: CaptionPipelineConfig,
) -> CaptionResult<crate::types::PollTranscriptResponse> {
    let deadline = tokio::time::Instant::now() + config.poll_timeout;

    loop {
        let response = client.poll_transcript(transcript_id).await?;
        if response.status.is_terminal() {
            return Ok(response);
        }

        debug!("caption pipeline: transcript {} status {:?}, polling again", transcript_id, response.status);

        if tokio::time::Instant::now() >= deadline {
            warn!("caption pipeline: transcript {} did not reach a terminal status within budget", transcript_id);
            return Err(CaptionError::Timeout);
        }

        tokio::time::sleep(config.poll_interval.min(deadline - tokio::time::Instant::now())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TranscriptionClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TranscriptionClient {
        TranscriptionClient::new(TranscriptionClientConfig {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn happy_path_uploads_creates_polls_and_chunks() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "upload_url": "https://provider.test/blob/abc"
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "t1"})))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/transcript/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1",
                "status": "completed",
                "utterances": [{"text": "hello world", "start": 0, "end": 1000, "words": []}],
                "words": [
                    {"text": "hello", "start": 0, "end": 400},
                    {"text": "world", "start": 500, "end": 1000}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.mp3");
        tokio::fs::write(&audio, b"fake audio bytes").await.unwrap();

        let chunks = run_caption_pipeline(
            &client,
            &audio,
            &CaptionStyle::Normal,
            false,
            CaptionPipelineConfig {
                poll_interval: Duration::from_millis(1),
                poll_timeout: Duration::from_secs(2),
            },
        )
        .await
        .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
    }

    #[tokio::test]
    async fn provider_error_status_maps_to_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"upload_url": "u"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "t1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transcript/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1", "status": "error", "error": "decode failure"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.mp3");
        tokio::fs::write(&audio, b"x").await.unwrap();

        let err = run_caption_pipeline(
            &client,
            &audio,
            &CaptionStyle::Normal,
            false,
            CaptionPipelineConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CaptionError::ProviderError(_)));
    }

    #[tokio::test]
    async fn never_reaching_terminal_status_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"upload_url": "u"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/transcript"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "t1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transcript/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "t1", "status": "processing"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.mp3");
        tokio::fs::write(&audio, b"x").await.unwrap();

        let err = run_caption_pipeline(
            &client,
            &audio,
            &CaptionStyle::Normal,
            false,
            CaptionPipelineConfig {
                poll_interval: Duration::from_millis(5),
                poll_timeout: Duration::from_millis(30),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CaptionError::Timeout));
    }
}
