//! C8: user push on completion and operator chat notifications. Both are
//! best-effort -- a failure here is logged and swallowed, never propagated
//! to the scheduler.

pub mod chat;
pub mod error;
pub mod push;

pub use chat::ChatNotifier;
pub use error::{NotifyError, NotifyResult};
pub use push::PushClient;
