//! Caption chunking: utterance splitting, text-first word matching, and
//! `captionStyle` application.

use clipcast_models::{CaptionChunk, CaptionStyle, Word};

use crate::types::{TranscriptUtterance, TranscriptWord};

/// Maximum characters per display line.
const MAX_CHARS_PER_LINE: usize = 40;
/// Maximum display lines per chunk.
const MAX_LINES_PER_CHUNK: usize = 3;
/// Search window, in milliseconds, around a sub-chunk's nominal mid-time
/// when matching it against the global word list.
const MATCH_WINDOW_MS: i64 = 5_000;

/// Build the ordered list of display-ready caption chunks from the
/// provider's utterances and global word list.
///
/// Chunking rules, applied in order:
/// 1. Never merge across a speaker change (utterance boundaries are respected).
/// 2. Within an utterance, split further when the text would exceed the line budget.
/// 3. For each chunk, find its actual words via text-first matching starting
///    at `last_word_index_used + 1`, not by proportional timing.
/// 4. Derive `start_ms`/`end_ms` from the matched words' own timestamps.
pub fn build_caption_chunks(
    utterances: &[TranscriptUtterance],
    global_words: &[TranscriptWord],
    caption_style: &CaptionStyle,
) -> Vec<CaptionChunk> {
    let mut chunks = Vec::new();
    let mut last_word_index_used: Option<usize> = None;

    for utterance in utterances {
        for piece in split_to_line_budget(&utterance.text) {
            let nominal_mid_ms = (utterance.start + utterance.end) / 2;
            let search_start = last_word_index_used.map(|i| i + 1).unwrap_or(0);

            let Some((matched_words, last_index)) =
                match_words(global_words, search_start, &piece, nominal_mid_ms)
            else {
                continue;
            };

            let start_ms = matched_words.first().map(|w| w.start_ms).unwrap_or(utterance.start);
            let end_ms = matched_words.last().map(|w| w.end_ms).unwrap_or(utterance.end);

            chunks.push(CaptionChunk {
                text: caption_style.apply(&piece),
                start_ms,
                end_ms,
                words: matched_words,
                last_word_index_in_transcript: last_index,
            });
            last_word_index_used = Some(last_index);
        }
    }

    chunks
}

/// Split an utterance's text into pieces that each fit the line budget
/// (`MAX_LINES_PER_CHUNK` lines of `MAX_CHARS_PER_LINE` chars), splitting on
/// word boundaries only.
fn split_to_line_budget(text: &str) -> Vec<String> {
    let budget = MAX_CHARS_PER_LINE * MAX_LINES_PER_CHUNK;
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in words {
        let candidate_len = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if candidate_len > budget && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Normalize a word for matching: lowercase, strip surrounding punctuation.
fn normalize(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Find the first contiguous run of words in `global_words[search_start..]`
/// whose normalized text matches `piece`'s words in order, restricted to a
/// window of `nominal_mid_ms ± MATCH_WINDOW_MS`.
fn match_words(
    global_words: &[TranscriptWord],
    search_start: usize,
    piece: &str,
    nominal_mid_ms: i64,
) -> Option<(Vec<Word>, usize)> {
    let wanted: Vec<String> = piece.split_whitespace().map(normalize).collect();
    if wanted.is_empty() || search_start >= global_words.len() {
        return None;
    }

    let window_lo = nominal_mid_ms - MATCH_WINDOW_MS;
    let window_hi = nominal_mid_ms + MATCH_WINDOW_MS;

    for candidate_start in search_start..global_words.len() {
        let w = &global_words[candidate_start];
        if w.start_ms() < window_lo || w.start_ms() > window_hi {
            continue;
        }
        if normalize(&w.text) != wanted[0] {
            continue;
        }
        if candidate_start + wanted.len() > global_words.len() {
            continue;
        }
        let slice = &global_words[candidate_start..candidate_start + wanted.len()];
        let matches = slice.iter().zip(&wanted).all(|(gw, want)| &normalize(&gw.text) == want);
        if matches {
            let matched: Vec<Word> = slice
                .iter()
                .map(|gw| Word {
                    text: gw.text.clone(),
                    start_ms: gw.start,
                    end_ms: gw.end,
                })
                .collect();
            return Some((matched, candidate_start + wanted.len() - 1));
        }
    }

    None
}

trait StartMs {
    fn start_ms(&self) -> i64;
}
impl StartMs for TranscriptWord {
    fn start_ms(&self) -> i64 {
        self.start
    }
}
