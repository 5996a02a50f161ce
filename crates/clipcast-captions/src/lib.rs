//! Transcription provider client, bounded polling loop, and caption chunking.
//!
//! This crate provides:
//! - `client` - the transcription provider HTTP client (upload, create, poll)
//! - `types` - wire types for the provider's transcript JSON
//! - `chunk` - utterance splitting, text-first word matching with a position
//!   cursor, and `captionStyle` application
//! - `pipeline` - the bounded upload -> poll -> chunk loop a worker calls
//! - `error` - the caption pipeline's error type

pub mod chunk;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod types;

pub use chunk::build_caption_chunks;
pub use client::{TranscriptionClient, TranscriptionClientConfig};
pub use error::{CaptionError, CaptionResult};
pub use pipeline::{run_caption_pipeline, CaptionPipelineConfig};
