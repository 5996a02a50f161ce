//! Shared data models for the clipcast rendering pipeline.
//!
//! This crate provides serde-serializable types for:
//! - Jobs and their immutable request (`job`, `request`)
//! - Caption chunks, the caption pipeline's derived output (`caption`)
//! - The Frame Spec consumed by the renderer (`frame`)
//! - Cost estimation and the realized cost breakdown (`cost`)
//! - The cross-crate error-kind taxonomy (`error_kind`)
//! - FFmpeg encoding configuration (`encoding`)

pub mod caption;
pub mod cost;
pub mod encoding;
pub mod error_kind;
pub mod frame;
pub mod job;
pub mod request;

pub use caption::{active_chunk, CaptionChunk, Word};
pub use cost::{CostBreakdown, CostConfig};
pub use encoding::EncodingConfig;
pub use error_kind::ErrorKind;
pub use frame::{
    frame_count, watermark_bar_height, watermark_bar_heights, wrap_text, CaptionLine, FrameSpec, CANVAS_HEIGHT,
    CANVAS_WIDTH, FPS, SIDE_MARGIN_FRACTION, TITLE_WRAP_CHARS, WATERMARK_BAR_COUNT,
};
pub use job::{Job, JobId, JobResult, JobStatus};
pub use request::{AdmissionError, CaptionStyle, CreateVideoRequest, PodcastMetadata, MAX_CLIP_DURATION_MS, MIN_CLIP_DURATION_MS};
