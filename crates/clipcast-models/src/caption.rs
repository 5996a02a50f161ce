//! Caption chunks: derived, ephemeral per-job output of the caption pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single transcribed word with clip-relative timing, taken directly from
/// the transcription provider (never interpolated).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Word {
    pub text: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// A display-ready caption chunk bound to an explicit visibility window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CaptionChunk {
    /// Display string, after `captionStyle` transform.
    pub text: String,
    /// Clip-relative window in which the chunk is shown.
    pub start_ms: i64,
    pub end_ms: i64,
    /// Actual transcript words present in this chunk.
    pub words: Vec<Word>,
    /// Transcript word index of this chunk's last matched word. Anchors the
    /// next chunk's search and prevents re-matching duplicate phrases.
    pub last_word_index_in_transcript: usize,
}

impl CaptionChunk {
    /// Whether `t_ms` (clip-relative) falls within this chunk's visibility window.
    pub fn contains(&self, t_ms: i64) -> bool {
        t_ms >= self.start_ms && t_ms < self.end_ms
    }
}

/// Find the chunk active at `t_ms`, if any. Chunks are assumed non-overlapping
/// and ordered by `start_ms`, as produced by the chunking pipeline.
pub fn active_chunk(chunks: &[CaptionChunk], t_ms: i64) -> Option<&CaptionChunk> {
    chunks.iter().find(|c| c.contains(t_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start: i64, end: i64) -> CaptionChunk {
        CaptionChunk {
            text: "hi".to_string(),
            start_ms: start,
            end_ms: end,
            words: vec![],
            last_word_index_in_transcript: 0,
        }
    }

    #[test]
    fn active_chunk_picks_containing_window() {
        let chunks = vec![chunk(0, 1000), chunk(1000, 2500)];
        assert_eq!(active_chunk(&chunks, 500).unwrap().start_ms, 0);
        assert_eq!(active_chunk(&chunks, 1500).unwrap().start_ms, 1000);
        assert!(active_chunk(&chunks, 3000).is_none());
    }

    #[test]
    fn window_is_half_open() {
        let c = chunk(1000, 2000);
        assert!(c.contains(1000));
        assert!(!c.contains(2000));
    }
}
