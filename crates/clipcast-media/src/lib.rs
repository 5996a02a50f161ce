#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for audio acquisition, clipping, and final video muxing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building, including sample-accurate output-side seeking
//! - Progress parsing from `-progress pipe:2`
//! - Cancellation and timeout support via tokio
//! - HTTP source download, byte-accurate audio clipping, and frame+audio muxing

pub mod clip;
pub mod command;
pub mod download;
pub mod error;
pub mod fs_utils;
pub mod mux;
pub mod probe;
pub mod progress;

pub use clip::clip_audio;
pub use command::{FfmpegCommand, FfmpegRunner};
pub use download::{download_audio, is_supported_url, DEFAULT_DOWNLOAD_TIMEOUT};
pub use error::{MediaError, MediaResult};
pub use fs_utils::move_file;
pub use mux::mux_frames_and_audio;
pub use probe::{probe_video, VideoInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
