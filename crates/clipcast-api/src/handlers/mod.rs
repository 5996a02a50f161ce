//! Request handlers for the C9 HTTP surface.

pub mod create_video;
pub mod download_video;
pub mod health;
pub mod transcript;
pub mod video_status;

pub use create_video::create_video;
pub use download_video::download_video;
pub use health::{health, ready};
pub use transcript::{get_transcript, post_transcript};
pub use video_status::video_status;
