//! Frame Spec: the derived, ephemeral value object that binds every per-frame
//! input the renderer needs, with no access to global state.

use serde::Serialize;

/// Fixed canvas dimensions. One canonical aspect ratio, per the non-goals.
pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1920;
/// Fixed target frame rate.
pub const FPS: u32 = 12;
/// Side margin as a fraction of canvas width.
pub const SIDE_MARGIN_FRACTION: f64 = 0.08;
/// Episode title wrap width, characters per line.
pub const TITLE_WRAP_CHARS: usize = 35;
/// Number of dancing-bar watermark bars.
pub const WATERMARK_BAR_COUNT: usize = 5;

/// One watermark bar's computed height for a given frame.
///
/// `baseHeight × (0.6 + 0.4·sin(0.1·i + 0.3·barIndex))` — the constants define
/// the visual identity and must be reproduced exactly.
pub fn watermark_bar_height(base_height: f64, frame_index: u64, bar_index: usize) -> f64 {
    base_height * (0.6 + 0.4 * (0.1 * frame_index as f64 + 0.3 * bar_index as f64).sin())
}

/// All five dancing-bar heights for a frame.
pub fn watermark_bar_heights(base_height: f64, frame_index: u64) -> [f64; WATERMARK_BAR_COUNT] {
    std::array::from_fn(|i| watermark_bar_height(base_height, frame_index, i))
}

/// A caption line ready for direct template binding (already wrapped, styled).
#[derive(Debug, Clone, Serialize)]
pub struct CaptionLine {
    pub text: String,
}

/// Everything needed to render a single PNG frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSpec {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Frame index within the sequence, `[0, round(fps * duration))`.
    pub frame_index: u64,
    /// `t / duration`, in `[0, 1]`.
    pub progress: f64,
    pub title: String,
    pub podcast_name: String,
    /// Episode title, pre-wrapped to `TITLE_WRAP_CHARS`-character lines.
    pub title_lines: Vec<String>,
    /// Dancing-bar heights for this frame, one per bar.
    pub watermark_bar_heights: [f64; WATERMARK_BAR_COUNT],
    /// Zero-or-more caption display lines (split to a bounded line budget).
    pub caption_lines: Vec<CaptionLine>,
}

/// Wrap `text` to lines of at most `max_chars`, breaking on whitespace.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate_len = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if candidate_len > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Compute the frame index count for a clip of `duration_sec` at `fps`.
pub fn frame_count(duration_sec: f64, fps: u32) -> u64 {
    (duration_sec * fps as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watermark_constants_match_spec_formula() {
        let h = watermark_bar_height(100.0, 0, 0);
        assert!((h - 100.0 * 0.6).abs() < 1e-9);

        let h2 = watermark_bar_height(100.0, 10, 2);
        let expected = 100.0 * (0.6 + 0.4 * (0.1_f64 * 10.0 + 0.3 * 2.0).sin());
        assert!((h2 - expected).abs() < 1e-9);
    }

    #[test]
    fn bar_heights_oscillate_within_baseline_envelope() {
        let heights = watermark_bar_heights(50.0, 42);
        for h in heights {
            assert!(h >= 50.0 * 0.2 - 1e-9 && h <= 50.0 * 1.0 + 1e-9);
        }
    }

    #[test]
    fn wrap_text_respects_char_budget() {
        let lines = wrap_text("this is a fairly long episode title that needs wrapping", 20);
        for line in &lines {
            assert!(line.len() <= 20 || !line.contains(' '));
        }
        assert!(lines.len() > 1);
    }

    #[test]
    fn frame_count_rounds_to_nearest() {
        assert_eq!(frame_count(30.0, 12), 360);
        assert_eq!(frame_count(2.51, 1), 3);
    }
}
