//! The C4 -> C5 -> C6 -> C7 -> C8 pipeline, implementing
//! `clipcast_scheduler::JobProcessor`. Pure library: this process no longer
//! owns its own binary, since the scheduler's worker pool runs in-process
//! inside `clipcast-api`'s `main`.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::JobLogger;
pub use pipeline::VideoPipelineProcessor;
