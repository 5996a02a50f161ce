//! Cost estimation and the realized cost breakdown attached to a completed job.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-unit cost constants. Loaded from env with these defaults; see
/// `clipcast-scheduler`'s `BudgetConfig` for the env-driven wrapper.
#[derive(Debug, Clone, Copy)]
pub struct CostConfig {
    /// USD per audio-minute downloaded/clipped.
    pub audio_minute_cost: f64,
    /// Flat per-video processing cost (rendering + muxing).
    pub flat_processing_cost: f64,
    /// USD per clip-minute when captions are requested.
    pub caption_cost_per_minute: f64,
    /// Flat surcharge when `enableSmartFeatures` is set (extra provider-side
    /// analysis requested in the transcription step).
    pub smart_features_surcharge: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            audio_minute_cost: 0.002,
            flat_processing_cost: 0.001,
            caption_cost_per_minute: 0.006,
            smart_features_surcharge: 0.001,
        }
    }
}

impl CostConfig {
    /// Estimate the cost of a clip of `clip_duration_ms` with the given feature flags.
    pub fn estimate(&self, clip_duration_ms: i64, captions_enabled: bool, enable_smart_features: bool) -> f64 {
        let minutes = clip_duration_ms as f64 / 60_000.0;
        let mut cost = self.flat_processing_cost + minutes * self.audio_minute_cost;
        if captions_enabled {
            cost += minutes * self.caption_cost_per_minute;
            if enable_smart_features {
                cost += self.smart_features_surcharge;
            }
        }
        cost
    }
}

/// Realized cost breakdown, attached to a job on completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CostBreakdown {
    pub download: f64,
    pub frame_generation: f64,
    pub composition: f64,
    pub storage: f64,
    pub captions: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.download + self.frame_generation + self.composition + self.storage + self.captions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_without_captions_is_flat_plus_duration() {
        let cfg = CostConfig::default();
        let cost = cfg.estimate(60_000, false, false);
        let expected = cfg.flat_processing_cost + cfg.audio_minute_cost;
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn smart_features_surcharge_only_applies_with_captions() {
        let cfg = CostConfig::default();
        let without_captions = cfg.estimate(60_000, false, true);
        let with_captions = cfg.estimate(60_000, true, true);
        assert!(with_captions > without_captions + cfg.caption_cost_per_minute - 1e-9);
    }

    #[test]
    fn cost_breakdown_total_sums_components() {
        let breakdown = CostBreakdown {
            download: 0.001,
            frame_generation: 0.002,
            composition: 0.0005,
            storage: 0.0001,
            captions: 0.003,
        };
        assert!((breakdown.total() - 0.0066).abs() < 1e-9);
    }
}
