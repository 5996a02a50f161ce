//! C1: feature flags, concurrency caps, per-day spend cap, and cost
//! constants, all environment-keyed per the documented contract names.

use clipcast_models::CostConfig;

/// Scheduler configuration, read from env at process start.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// `ENABLE_SERVER_VIDEO` -- master feature flag.
    pub enabled: bool,
    /// `MAX_CONCURRENT` -- worker pool size.
    pub max_concurrent: usize,
    /// `MAX_QUEUE_SIZE`.
    pub max_queue_size: usize,
    /// `DAILY_SPENDING_CAP`, USD.
    pub daily_spend_cap: f64,
    pub cost: CostConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_concurrent: 2,
            max_queue_size: 100,
            daily_spend_cap: 50.0,
            cost: CostConfig::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("ENABLE_SERVER_VIDEO")
                .ok()
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.enabled),
            max_concurrent: std::env::var("MAX_CONCURRENT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent),
            max_queue_size: std::env::var("MAX_QUEUE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_queue_size),
            daily_spend_cap: std::env::var("DAILY_SPENDING_CAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.daily_spend_cap),
            cost: defaults.cost,
        }
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
