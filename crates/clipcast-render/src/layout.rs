//! Element layout: every position is derived from the canvas dimensions and
//! the fixed 8% side margin, so a `Layout` can be computed once per job and
//! reused across every frame.

use clipcast_models::{CANVAS_HEIGHT, CANVAS_WIDTH, SIDE_MARGIN_FRACTION};

/// Gap, in canvas pixels, between the title block and the progress bar.
/// The spec names this "15 px below the title" at a reference 1080-wide
/// canvas; scaled here so a future canvas resize keeps the same proportion.
const TITLE_TO_PROGRESS_GAP_REFERENCE_PX: f64 = 15.0;
const REFERENCE_WIDTH: f64 = 1080.0;

const ARTWORK_FRACTION_OF_CONTENT_WIDTH: f64 = 1.0;
const PROGRESS_BAR_HEIGHT_FRACTION: f64 = 0.006;
const WATERMARK_BAR_WIDTH_FRACTION: f64 = 0.03;
const WATERMARK_BAR_GAP_FRACTION: f64 = 0.02;
const WATERMARK_BASE_HEIGHT_FRACTION: f64 = 0.05;

/// Computed element positions for the fixed 1080x1920 canvas. All fields are
/// in canvas pixels, independent of any single frame's progress/caption state.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub side_margin: f64,
    pub content_width: f64,

    pub artwork_size: f64,
    pub artwork_x: f64,
    pub artwork_y: f64,

    pub title_y: f64,
    pub title_line_height: f64,

    pub progress_bar_x: f64,
    pub progress_bar_y: f64,
    pub progress_bar_width: f64,
    pub progress_bar_height: f64,

    pub watermark_y: f64,
    pub watermark_bar_width: f64,
    pub watermark_bar_gap: f64,
    pub watermark_base_height: f64,

    pub caption_y: f64,
    pub caption_line_height: f64,
}

impl Layout {
    pub fn compute() -> Self {
        Self::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn for_canvas(canvas_width: u32, canvas_height: u32) -> Self {
        let w = canvas_width as f64;
        let h = canvas_height as f64;
        let side_margin = w * SIDE_MARGIN_FRACTION;
        let content_width = w - 2.0 * side_margin;

        let artwork_size = content_width * ARTWORK_FRACTION_OF_CONTENT_WIDTH;
        let artwork_x = side_margin;
        let artwork_y = h * 0.18;

        let title_y = artwork_y + artwork_size + h * 0.04;
        let title_line_height = h * 0.028;

        let gap = TITLE_TO_PROGRESS_GAP_REFERENCE_PX * (w / REFERENCE_WIDTH);
        let progress_bar_y = title_y + title_line_height * 3.0 + gap;
        let progress_bar_height = h * PROGRESS_BAR_HEIGHT_FRACTION;

        let watermark_y = progress_bar_y + progress_bar_height + h * 0.03;
        let watermark_bar_width = w * WATERMARK_BAR_WIDTH_FRACTION;
        let watermark_bar_gap = w * WATERMARK_BAR_GAP_FRACTION;
        let watermark_base_height = h * WATERMARK_BASE_HEIGHT_FRACTION;

        let caption_y = h * 0.82;
        let caption_line_height = h * 0.035;

        Self {
            canvas_width,
            canvas_height,
            side_margin,
            content_width,
            artwork_size,
            artwork_x,
            artwork_y,
            title_y,
            title_line_height,
            progress_bar_x: side_margin,
            progress_bar_y,
            progress_bar_width: content_width,
            progress_bar_height,
            watermark_y,
            watermark_bar_width,
            watermark_bar_gap,
            watermark_base_height,
            caption_y,
            caption_line_height,
        }
    }

    /// Horizontal center of the watermark bar group.
    pub fn watermark_group_x(&self, bar_count: usize) -> f64 {
        let total_width =
            bar_count as f64 * self.watermark_bar_width + (bar_count as f64 - 1.0) * self.watermark_bar_gap;
        self.side_margin + (self.content_width - total_width) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_keeps_artwork_within_side_margins() {
        let layout = Layout::compute();
        assert!(layout.artwork_x >= layout.side_margin - 1e-9);
        assert!(layout.artwork_x + layout.artwork_size <= layout.canvas_width as f64 - layout.side_margin + 1e-9);
    }

    #[test]
    fn progress_bar_sits_below_title_block() {
        let layout = Layout::compute();
        assert!(layout.progress_bar_y > layout.title_y);
    }

    #[test]
    fn watermark_group_is_horizontally_centered() {
        let layout = Layout::compute();
        let group_x = layout.watermark_group_x(5);
        let total_width = 5.0 * layout.watermark_bar_width + 4.0 * layout.watermark_bar_gap;
        let right_gap = layout.canvas_width as f64 - layout.side_margin - (group_x + total_width);
        let left_gap = group_x - layout.side_margin;
        assert!((right_gap - left_gap).abs() < 1.0);
    }
}
