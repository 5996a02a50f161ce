//! C9: the HTTP surface -- admission, status, download, transcript proxy,
//! and the ambient health/readiness/metrics endpoints. Wires C1-C8 together
//! for external callers; `main` wires them together for the process itself.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{GaugeRefresher, RetentionSweeper};
pub use state::AppState;
