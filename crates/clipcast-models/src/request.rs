//! The immutable submission carried by a job: `CreateVideoRequest` and its nested types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Podcast/episode metadata attached to a clip request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodcastMetadata {
    /// Episode title.
    pub title: String,
    /// Artwork URL, fetched once per job by the frame renderer.
    pub artwork: String,
    pub podcast_name: String,
}

/// Case transform applied to caption display text. Word timestamps are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    #[default]
    Normal,
    Uppercase,
    Lowercase,
    Title,
}

impl CaptionStyle {
    /// Apply the case transform to already-formatted display text.
    pub fn apply(&self, text: &str) -> String {
        match self {
            CaptionStyle::Normal => text.to_string(),
            CaptionStyle::Uppercase => text.to_uppercase(),
            CaptionStyle::Lowercase => text.to_lowercase(),
            CaptionStyle::Title => title_case(text),
        }
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The immutable `POST /api/create-video` submission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    /// Source audio URL, http(s) only.
    pub audio_url: String,
    /// Clip start, ms, inclusive.
    pub clip_start: i64,
    /// Clip end, ms, exclusive.
    pub clip_end: i64,
    pub podcast: PodcastMetadata,
    #[serde(default)]
    pub captions_enabled: bool,
    #[serde(default)]
    pub caption_style: CaptionStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
    #[serde(default)]
    pub enable_smart_features: bool,
}

/// Error kinds rejected at admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionError {
    FeatureDisabled,
    QueueFull,
    BudgetExceeded,
    InvalidRequest,
}

impl AdmissionError {
    /// The wire `code` string documented in the HTTP API.
    pub fn code(&self) -> &'static str {
        match self {
            AdmissionError::FeatureDisabled => "FEATURE_DISABLED",
            AdmissionError::QueueFull => "QUEUE_FULL",
            AdmissionError::BudgetExceeded => "BUDGET_EXCEEDED",
            AdmissionError::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            AdmissionError::FeatureDisabled => "video rendering is currently disabled",
            AdmissionError::QueueFull => "the job queue is full, try again later",
            AdmissionError::BudgetExceeded => "today's rendering budget has been exhausted",
            AdmissionError::InvalidRequest => "the request is invalid",
        };
        write!(f, "{}", msg)
    }
}

/// Minimum/maximum clip duration, milliseconds.
pub const MIN_CLIP_DURATION_MS: i64 = 1_000;
pub const MAX_CLIP_DURATION_MS: i64 = 240_000;

impl CreateVideoRequest {
    /// Validate the request shape independent of queue/budget state.
    /// Returns `Ok(())` or `AdmissionError::InvalidRequest`.
    pub fn validate(&self) -> Result<(), AdmissionError> {
        if !(self.audio_url.starts_with("http://") || self.audio_url.starts_with("https://")) {
            return Err(AdmissionError::InvalidRequest);
        }
        if self.clip_start < 0 || self.clip_start >= self.clip_end {
            return Err(AdmissionError::InvalidRequest);
        }
        let duration = self.clip_end - self.clip_start;
        if duration < MIN_CLIP_DURATION_MS || duration > MAX_CLIP_DURATION_MS {
            return Err(AdmissionError::InvalidRequest);
        }
        if !(self.podcast.artwork.starts_with("http://") || self.podcast.artwork.starts_with("https://")) {
            return Err(AdmissionError::InvalidRequest);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CreateVideoRequest {
        CreateVideoRequest {
            audio_url: "https://example.test/ep.mp3".to_string(),
            clip_start: 30_000,
            clip_end: 60_000,
            podcast: PodcastMetadata {
                title: "E1".to_string(),
                artwork: "https://example.test/a.png".to_string(),
                podcast_name: "Show".to_string(),
            },
            captions_enabled: false,
            caption_style: CaptionStyle::Normal,
            device_token: None,
            enable_smart_features: false,
        }
    }

    #[test]
    fn accepts_boundary_durations() {
        let mut req = base();
        req.clip_end = req.clip_start + MIN_CLIP_DURATION_MS;
        assert!(req.validate().is_ok());

        req.clip_end = req.clip_start + MAX_CLIP_DURATION_MS;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_over_long_clip() {
        let mut req = base();
        req.clip_end = req.clip_start + MAX_CLIP_DURATION_MS + 1_000;
        assert_eq!(req.validate(), Err(AdmissionError::InvalidRequest));
    }

    #[test]
    fn rejects_non_http_audio_url() {
        let mut req = base();
        req.audio_url = "ftp://example.test/ep.mp3".to_string();
        assert_eq!(req.validate(), Err(AdmissionError::InvalidRequest));
    }

    #[test]
    fn caption_style_title_case() {
        assert_eq!(CaptionStyle::Title.apply("the customer said hi"), "The Customer Said Hi");
        assert_eq!(CaptionStyle::Uppercase.apply("hi"), "HI");
        assert_eq!(CaptionStyle::Lowercase.apply("HI"), "hi");
        assert_eq!(CaptionStyle::Normal.apply("Hi There"), "Hi There");
    }
}
