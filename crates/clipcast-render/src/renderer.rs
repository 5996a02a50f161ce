//! Top-level frame renderer: binds the compiled template, the job's prepared
//! artwork, and the computed layout, then rasterizes a `FrameSpec` sequence
//! to a PNG file per frame.

use std::path::Path;

use clipcast_models::FrameSpec;
use rayon::prelude::*;
use tracing::info;

use crate::artwork::prepare_artwork_data_uri;
use crate::error::RenderResult;
use crate::layout::Layout;
use crate::rasterize::rasterize_svg_to_png;
use crate::template::{build_context, FrameTemplate};

/// Filename width for lexicographically-sortable frame names, e.g.
/// `frame_000000.png`. Generous enough for any clip at the fixed 12 fps
/// within the 240-second max duration (2880 frames).
const FRAME_FILENAME_DIGITS: usize = 6;

/// Renders every frame of one job. Holds the compiled template and the
/// job's decoded artwork; both are read-only for the renderer's lifetime,
/// so `render_sequence` may rasterize frames in parallel.
pub struct FrameRenderer {
    template: FrameTemplate,
    layout: Layout,
    artwork_data_uri: String,
}

impl FrameRenderer {
    /// `artwork_bytes` is the podcast artwork, downloaded once per job by the
    /// caller (the renderer itself does no network I/O).
    pub fn new(artwork_bytes: &[u8]) -> RenderResult<Self> {
        let template = FrameTemplate::compile()?;
        let layout = Layout::compute();
        let artwork_data_uri = prepare_artwork_data_uri(artwork_bytes, layout.artwork_size.round() as u32)?;
        Ok(Self { template, layout, artwork_data_uri })
    }

    /// Rasterize a single frame to PNG bytes.
    pub fn render_frame(&self, spec: &FrameSpec) -> RenderResult<Vec<u8>> {
        let caption_lines: Vec<String> = spec.caption_lines.iter().map(|l| l.text.clone()).collect();
        let ctx = build_context(
            &self.layout,
            &self.artwork_data_uri,
            &spec.title_lines,
            &spec.podcast_name,
            spec.progress,
            &spec.watermark_bar_heights,
            &caption_lines,
        );
        let svg = self.template.render(&ctx)?;
        rasterize_svg_to_png(&svg)
    }

    /// Rasterize every frame in `specs` into `out_dir`, named so
    /// lexicographic order equals frame order. Frames are independent of
    /// each other, so this fans out across `rayon`'s global pool.
    pub fn render_sequence(&self, specs: &[FrameSpec], out_dir: impl AsRef<Path>) -> RenderResult<()> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;

        info!("rendering {} frames to {}", specs.len(), out_dir.display());

        specs
            .par_iter()
            .map(|spec| {
                let png = self.render_frame(spec)?;
                let path = out_dir.join(frame_filename(spec.frame_index));
                std::fs::write(path, png)?;
                Ok(())
            })
            .collect::<RenderResult<Vec<()>>>()?;

        Ok(())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

/// The frame filename pattern, e.g. `frame_000000.png`, also usable directly
/// as the muxer's `image2` input pattern (`frame_%06d.png`).
pub fn frame_filename(frame_index: u64) -> String {
    format!("frame_{:0width$}.png", frame_index, width = FRAME_FILENAME_DIGITS)
}

pub const FRAME_GLOB_PATTERN: &str = "frame_%06d.png";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::build_frame_specs;

    fn tiny_png() -> Vec<u8> {
        let img = image::ImageBuffer::from_pixel(8, 8, image::Rgba([10u8, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn renders_a_frame_to_nonempty_png() {
        let renderer = FrameRenderer::new(&tiny_png()).unwrap();
        let specs = build_frame_specs(1.0, "Episode", "Show", &[]);
        let png = renderer.render_frame(&specs[0]).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn identical_inputs_render_byte_identical_pngs() {
        let renderer = FrameRenderer::new(&tiny_png()).unwrap();
        let specs = build_frame_specs(1.0, "Episode", "Show", &[]);
        let a = renderer.render_frame(&specs[5]).unwrap();
        let b = renderer.render_frame(&specs[5]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn render_sequence_writes_one_file_per_frame() {
        let renderer = FrameRenderer::new(&tiny_png()).unwrap();
        let specs = build_frame_specs(0.5, "Episode", "Show", &[]);
        let dir = tempfile::tempdir().unwrap();
        renderer.render_sequence(&specs, dir.path()).unwrap();

        let count = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, specs.len());
        assert!(dir.path().join(frame_filename(0)).exists());
    }

    #[test]
    fn frame_filenames_sort_lexicographically_in_frame_order() {
        let names: Vec<String> = (0..12).map(frame_filename).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
