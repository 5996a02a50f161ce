//! Local-filesystem video storage, URL minting, and the retention sweep.
//!
//! This crate provides:
//! - Storing completed MP4s under a predictable path layout
//! - Minting absolute playback/download URLs from `RAILWAY_PUBLIC_DOMAIN`
//! - A retention sweep deleting completed-job videos past `VIDEO_RETENTION_HOURS`

pub mod error;
pub mod local;

pub use error::{StorageError, StorageResult};
pub use local::{LocalVideoStorage, StorageConfig};
