//! Builds the ordered `FrameSpec` sequence for one job: frame index, progress,
//! wrapped title, watermark phase, and the caption chunk active at each
//! frame's clip-relative timestamp.

use clipcast_models::{
    active_chunk, frame_count, watermark_bar_heights, wrap_text, CaptionChunk, CaptionLine, FrameSpec, CANVAS_HEIGHT,
    CANVAS_WIDTH, FPS, TITLE_WRAP_CHARS,
};

/// Baseline height, in canvas pixels, the dancing-bars watermark oscillates
/// around. Fixed brand constant, not derived from layout.
const WATERMARK_BASE_HEIGHT: f64 = 40.0;
/// Max caption lines bound per frame (chunking already enforces this; kept
/// here as the renderer's own defensive bound).
const MAX_CAPTION_LINES: usize = 3;
const MAX_CAPTION_CHARS_PER_LINE: usize = 40;

/// Build every frame's `FrameSpec` for a clip of `duration_sec`, at the fixed
/// `FPS`, binding `captions` (already clip-relative, possibly empty) and
/// `clip_start_ms` (needed to resolve a caption's absolute visibility window
/// against this frame's clip-relative timestamp -- both are clip-relative
/// here, so `clip_start_ms` is informational only and not subtracted again).
pub fn build_frame_specs(
    duration_sec: f64,
    title: &str,
    podcast_name: &str,
    captions: &[CaptionChunk],
) -> Vec<FrameSpec> {
    let total_frames = frame_count(duration_sec, FPS);
    let title_lines = wrap_text(title, TITLE_WRAP_CHARS);

    (0..total_frames)
        .map(|frame_index| {
            let t_sec = frame_index as f64 / FPS as f64;
            let progress = if duration_sec > 0.0 { (t_sec / duration_sec).clamp(0.0, 1.0) } else { 0.0 };
            let t_ms = (t_sec * 1000.0).round() as i64;

            let caption_lines = active_chunk(captions, t_ms)
                .map(|chunk| {
                    wrap_text(&chunk.text, MAX_CAPTION_CHARS_PER_LINE)
                        .into_iter()
                        .take(MAX_CAPTION_LINES)
                        .map(|text| CaptionLine { text })
                        .collect()
                })
                .unwrap_or_default();

            FrameSpec {
                canvas_width: CANVAS_WIDTH,
                canvas_height: CANVAS_HEIGHT,
                frame_index,
                progress,
                title: title.to_string(),
                podcast_name: podcast_name.to_string(),
                title_lines: title_lines.clone(),
                watermark_bar_heights: watermark_bar_heights(WATERMARK_BASE_HEIGHT, frame_index),
                caption_lines,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcast_models::Word;

    fn chunk(text: &str, start: i64, end: i64) -> CaptionChunk {
        CaptionChunk {
            text: text.to_string(),
            start_ms: start,
            end_ms: end,
            words: vec![Word { text: text.to_string(), start_ms: start, end_ms: end }],
            last_word_index_in_transcript: 0,
        }
    }

    #[test]
    fn frame_count_matches_duration_and_fps() {
        let specs = build_frame_specs(30.0, "Title", "Show", &[]);
        assert_eq!(specs.len(), 360);
    }

    #[test]
    fn captions_bind_only_within_their_visibility_window() {
        let captions = vec![chunk("hi there", 0, 1000)];
        let specs = build_frame_specs(2.0, "T", "S", &captions);
        let at_500ms = &specs[FPS as usize / 2];
        assert!(!at_500ms.caption_lines.is_empty());
        let at_1500ms = specs.last().unwrap();
        assert!(at_1500ms.caption_lines.is_empty());
    }

    #[test]
    fn frame_specs_are_deterministic_across_calls() {
        let a = build_frame_specs(5.0, "T", "S", &[]);
        let b = build_frame_specs(5.0, "T", "S", &[]);
        for (fa, fb) in a.iter().zip(b.iter()) {
            assert_eq!(fa.watermark_bar_heights, fb.watermark_bar_heights);
            assert_eq!(fa.progress, fb.progress);
        }
    }
}
