//! The C4 -> C5 (optional) -> C6 -> C7 -> C8 pipeline, implementing
//! `clipcast_scheduler::JobProcessor`. One instance is constructed once in
//! `main` and shared across every worker task in the bounded pool.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use clipcast_captions::{CaptionPipelineConfig, TranscriptionClient};
use clipcast_media::{clip_audio, download_audio, mux_frames_and_audio};
use clipcast_models::{CaptionChunk, CostBreakdown, Job, JobId, JobResult};
use clipcast_notify::{ChatNotifier, PushClient};
use clipcast_render::{build_frame_specs, FrameRenderer, FRAME_GLOB_PATTERN};
use clipcast_scheduler::ProcessingFailure;
use clipcast_storage::LocalVideoStorage;
use tracing::{info, warn, Instrument};

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::logging::JobLogger;

/// Ties every pipeline dependency together. Cheap to clone: everything
/// inside is already `Arc`-backed or itself cheaply cloneable.
#[derive(Clone)]
pub struct VideoPipelineProcessor {
    config: WorkerConfig,
    storage: LocalVideoStorage,
    transcription: TranscriptionClient,
    caption_pipeline_config: CaptionPipelineConfig,
    push: PushClient,
    chat: ChatNotifier,
    cost: clipcast_models::CostConfig,
    artwork_http: reqwest::Client,
}

impl VideoPipelineProcessor {
    pub fn new(
        config: WorkerConfig,
        storage: LocalVideoStorage,
        transcription: TranscriptionClient,
        cost: clipcast_models::CostConfig,
    ) -> Self {
        let artwork_http = reqwest::Client::builder()
            .timeout(config.artwork_fetch_timeout)
            .build()
            .expect("failed to build artwork HTTP client");
        Self {
            config,
            storage,
            transcription,
            caption_pipeline_config: CaptionPipelineConfig::default(),
            push: PushClient::from_env(),
            chat: ChatNotifier::from_env(),
            cost,
            artwork_http,
        }
    }

    async fn run(&self, job: &Job) -> Result<JobResult, WorkerError> {
        let started = Instant::now();
        let job_id = job.id.clone();
        let logger = JobLogger::new(&job_id, "pipeline");
        let temp_dir = self.storage.job_temp_dir(job_id.as_str());
        tokio::fs::create_dir_all(&temp_dir).await?;

        let result = self.run_inner(job, &temp_dir, &logger, started).await;

        if let Err(e) = tokio::fs::remove_dir_all(&temp_dir).await {
            warn!(job_id = %job_id, error = %e, "failed to clean up job temp directory");
        }

        result
    }

    async fn run_inner(
        &self,
        job: &Job,
        temp_dir: &std::path::Path,
        logger: &JobLogger,
        started: Instant,
    ) -> Result<JobResult, WorkerError> {
        let request = &job.request;
        let duration_ms = job.clip_duration_ms();
        let duration_sec = duration_ms as f64 / 1000.0;

        let source_path = temp_dir.join("source");
        let clipped_audio_path = temp_dir.join("clip.m4a");
        let frames_dir = temp_dir.join("frames");
        let output_path = temp_dir.join("output.mp4");

        logger.log_start(&format!("downloading source audio from {}", request.audio_url));
        download_audio(&request.audio_url, &source_path, self.config.download_timeout).await.map_err(WorkerError::Clip)?;

        logger.log_progress("clipping byte-accurate audio segment");
        clip_audio(&source_path, &clipped_audio_path, request.clip_start, request.clip_end, &self.config.encoding, |_p| {})
            .await
            .map_err(WorkerError::Clip)?;

        let captions = if request.captions_enabled {
            self.run_captions(&clipped_audio_path, request, logger).await
        } else {
            Vec::new()
        };

        logger.log_progress("fetching podcast artwork");
        let artwork_bytes = self.fetch_artwork(&request.podcast.artwork).await?;

        logger.log_progress("rendering frame sequence");
        let renderer = FrameRenderer::new(&artwork_bytes)?;
        let specs = build_frame_specs(duration_sec, &request.podcast.title, &request.podcast.podcast_name, &captions);
        renderer.render_sequence(&specs, &frames_dir)?;

        logger.log_progress("muxing frames and audio");
        let frame_pattern = frames_dir.join(FRAME_GLOB_PATTERN);
        mux_frames_and_audio(&frame_pattern, &clipped_audio_path, &output_path, clipcast_models::FPS, duration_ms)
            .await
            .map_err(WorkerError::Mux)?;

        let file_size_bytes = tokio::fs::metadata(&output_path).await?.len();
        let stored_path = self.storage.store_video(job.id.as_str(), &output_path).await?;
        let _ = stored_path;

        let processing_time_ms = started.elapsed().as_millis() as u64;
        let cost_breakdown = self.cost_breakdown(duration_ms, request.captions_enabled);

        logger.log_completion(&format!("completed in {processing_time_ms}ms"));

        Ok(JobResult {
            video_url: self.storage.generate_video_url(job.id.as_str()),
            download_url: self.storage.generate_download_url(job.id.as_str()),
            file_size_bytes,
            duration_sec,
            processing_time_ms,
            cost_breakdown,
        })
    }

    /// Runs the caption pipeline and demotes any failure to "no captions",
    /// per the graceful-degradation contract -- never surfaced as a
    /// `WorkerError`.
    async fn run_captions(
        &self,
        clipped_audio_path: &std::path::Path,
        request: &clipcast_models::CreateVideoRequest,
        logger: &JobLogger,
    ) -> Vec<CaptionChunk> {
        logger.log_progress("running caption pipeline");
        match clipcast_captions::run_caption_pipeline(
            &self.transcription,
            clipped_audio_path,
            &request.caption_style,
            request.enable_smart_features,
            self.caption_pipeline_config,
        )
        .await
        {
            Ok(chunks) => chunks,
            Err(e) => {
                logger.log_warning(&format!("caption pipeline failed, continuing without captions: {e}"));
                Vec::new()
            }
        }
    }

    async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, WorkerError> {
        let response = self
            .artwork_http
            .get(url)
            .send()
            .await
            .map_err(|e| WorkerError::ArtworkFetch(e.to_string()))?;
        if !response.status().is_success() {
            return Err(WorkerError::ArtworkFetch(format!("artwork fetch returned {}", response.status())));
        }
        Ok(response.bytes().await.map_err(|e| WorkerError::ArtworkFetch(e.to_string()))?.to_vec())
    }

    fn cost_breakdown(&self, clip_duration_ms: i64, captions_enabled: bool) -> CostBreakdown {
        let minutes = clip_duration_ms as f64 / 60_000.0;
        CostBreakdown {
            download: minutes * self.cost.audio_minute_cost,
            frame_generation: self.cost.flat_processing_cost * 0.6,
            composition: self.cost.flat_processing_cost * 0.4,
            storage: 0.0,
            captions: if captions_enabled { minutes * self.cost.caption_cost_per_minute } else { 0.0 },
        }
    }

    async fn notify(&self, job_id: &JobId, request: &clipcast_models::CreateVideoRequest, outcome: &Result<JobResult, WorkerError>, estimated_cost: f64) {
        match outcome {
            Ok(result) => {
                self.chat
                    .notify_completed(job_id.as_str(), estimated_cost, result.cost_breakdown.total(), result.processing_time_ms)
                    .await;
                if let Some(token) = &request.device_token {
                    if let Err(e) = self
                        .push
                        .send_completion(token, &request.podcast.podcast_name, &request.podcast.title, job_id.as_str())
                        .await
                    {
                        warn!(job_id = %job_id, error = %e, "push notification failed, not failing the job");
                    }
                }
            }
            Err(e) => {
                self.chat.notify_failed(job_id.as_str(), &e.to_string()).await;
            }
        }
    }
}

#[async_trait]
impl clipcast_scheduler::JobProcessor for VideoPipelineProcessor {
    async fn process(&self, job: &Job) -> Result<JobResult, ProcessingFailure> {
        let job_id = job.id.clone();
        let logger = JobLogger::new(&job_id, "pipeline");
        let span = logger.create_span();

        self.chat.notify_started(job_id.as_str(), job.estimated_cost, job.estimated_time_sec).await;

        let timeout = self.config.job_timeout(job.clip_duration_ms());
        let outcome = match tokio::time::timeout(timeout, self.run(job).instrument(span)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(job_id = %job_id, "pipeline exceeded its wall-clock budget, abandoning in-flight work");
                Err(WorkerError::Timeout)
            }
        };

        // `run`'s own cleanup does not execute if `timeout` cancelled the
        // future mid-poll; sweep the deterministic per-job path again here.
        let temp_dir = self.storage.job_temp_dir(job_id.as_str());
        let _ = tokio::fs::remove_dir_all(&temp_dir).await;

        self.notify(&job_id, &job.request, &outcome, job.estimated_cost).await;

        outcome.map_err(|e| {
            let kind = e.kind();
            info!(job_id = %job_id, %kind, "pipeline stage failed");
            ProcessingFailure::new(kind, e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_breakdown_scales_with_duration_and_captions() {
        let processor_cost = clipcast_models::CostConfig::default();
        let config = WorkerConfig::default();
        let storage = LocalVideoStorage::new(clipcast_storage::StorageConfig {
            output_dir: PathBuf::from("/tmp/clipcast-test"),
            public_domain: None,
        });
        let transcription = TranscriptionClient::new(clipcast_captions::TranscriptionClientConfig {
            base_url: "https://example.test".to_string(),
            api_key: "k".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        let processor = VideoPipelineProcessor::new(config, storage, transcription, processor_cost);

        let without_captions = processor.cost_breakdown(60_000, false);
        let with_captions = processor.cost_breakdown(60_000, true);
        assert!(with_captions.total() > without_captions.total());
        assert_eq!(without_captions.captions, 0.0);
    }
}
