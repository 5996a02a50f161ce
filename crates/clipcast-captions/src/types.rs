//! Transcription provider wire types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTranscriptRequest {
    pub audio_url: String,
    pub speaker_labels: bool,
    pub speakers_expected: u32,
    pub format_text: bool,
    pub punctuate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_highlights: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_analysis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_detection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iab_categories: Option<bool>,
}

impl CreateTranscriptRequest {
    pub fn new(audio_url: String, enable_smart_features: bool) -> Self {
        let smart = enable_smart_features.then_some(true);
        Self {
            audio_url,
            speaker_labels: true,
            speakers_expected: 2,
            format_text: true,
            punctuate: true,
            auto_highlights: smart,
            sentiment_analysis: smart,
            entity_detection: smart,
            iab_categories: smart,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTranscriptResponse {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Error)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptWord {
    pub text: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub speaker: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptUtterance {
    #[serde(default)]
    pub speaker: Option<String>,
    pub text: String,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollTranscriptResponse {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub utterances: Vec<TranscriptUtterance>,
    #[serde(default)]
    pub words: Vec<TranscriptWord>,
}
