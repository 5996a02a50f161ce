//! The vector template: a Handlebars-rendered SVG string, parameterized per
//! frame by progress, animation phase, and the current caption.
//!
//! Compiled once at process start and treated as read-only afterward (see
//! the shared-resource policy for the template cache); `FrameTemplate::new`
//! is the only place that registers or parses it.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::RenderResult;
use crate::layout::Layout;

const TEMPLATE_NAME: &str = "frame";

const TEMPLATE_SOURCE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{canvas_width}}" height="{{canvas_height}}" viewBox="0 0 {{canvas_width}} {{canvas_height}}">
  <rect x="0" y="0" width="{{canvas_width}}" height="{{canvas_height}}" fill="#0b0b0f"/>

  <image x="{{artwork_x}}" y="{{artwork_y}}" width="{{artwork_size}}" height="{{artwork_size}}" href="{{artwork_data_uri}}"/>

  {{#each title_lines}}
  <text x="{{../canvas_center_x}}" y="{{add ../title_y (mul @index ../title_line_height)}}" font-family="sans-serif" font-size="{{../title_font_size}}" fill="#ffffff" text-anchor="middle">{{this}}</text>
  {{/each}}
  <text x="{{canvas_center_x}}" y="{{podcast_name_y}}" font-family="sans-serif" font-size="{{podcast_name_font_size}}" fill="#9a9aa5" text-anchor="middle">{{podcast_name}}</text>

  <rect x="{{progress_bar_x}}" y="{{progress_bar_y}}" width="{{progress_bar_width}}" height="{{progress_bar_height}}" rx="{{progress_bar_radius}}" fill="#2a2a33"/>
  <rect x="{{progress_bar_x}}" y="{{progress_bar_y}}" width="{{progress_fill_width}}" height="{{progress_bar_height}}" rx="{{progress_bar_radius}}" fill="#ff5a5f"/>

  {{#each watermark_bars}}
  <rect x="{{this.x}}" y="{{this.y}}" width="{{this.width}}" height="{{this.height}}" rx="{{this.radius}}" fill="#ffffff" opacity="0.85"/>
  {{/each}}

  {{#if caption_lines}}
  <rect x="{{caption_box_x}}" y="{{caption_box_y}}" width="{{caption_box_width}}" height="{{caption_box_height}}" rx="12" fill="#000000" opacity="0.55"/>
  {{#each caption_lines}}
  <text x="{{../canvas_center_x}}" y="{{add ../caption_y (mul @index ../caption_line_height)}}" font-family="sans-serif" font-size="{{../caption_font_size}}" font-weight="bold" fill="#ffffff" text-anchor="middle">{{this}}</text>
  {{/each}}
  {{/if}}
</svg>
"##;

#[derive(Debug, Serialize)]
pub struct WatermarkBar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
pub struct FrameContext {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub canvas_center_x: f64,

    pub artwork_x: f64,
    pub artwork_y: f64,
    pub artwork_size: f64,
    pub artwork_data_uri: String,

    pub title_lines: Vec<String>,
    pub title_y: f64,
    pub title_line_height: f64,
    pub title_font_size: f64,
    pub podcast_name: String,
    pub podcast_name_y: f64,
    pub podcast_name_font_size: f64,

    pub progress_bar_x: f64,
    pub progress_bar_y: f64,
    pub progress_bar_width: f64,
    pub progress_bar_height: f64,
    pub progress_bar_radius: f64,
    pub progress_fill_width: f64,

    pub watermark_bars: Vec<WatermarkBar>,

    pub caption_lines: Vec<String>,
    pub caption_y: f64,
    pub caption_line_height: f64,
    pub caption_font_size: f64,
    pub caption_box_x: f64,
    pub caption_box_y: f64,
    pub caption_box_width: f64,
    pub caption_box_height: f64,
}

/// Owns the compiled Handlebars template. Construct once per process;
/// `render` is read-only and safe to call concurrently.
pub struct FrameTemplate {
    handlebars: Handlebars<'static>,
}

impl FrameTemplate {
    pub fn compile() -> RenderResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("add", Box::new(add_helper));
        handlebars.register_helper("mul", Box::new(mul_helper));
        handlebars.register_template_string(TEMPLATE_NAME, TEMPLATE_SOURCE)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, ctx: &FrameContext) -> RenderResult<String> {
        Ok(self.handlebars.render(TEMPLATE_NAME, ctx)?)
    }
}

fn add_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let a = h.param(0).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    let b = h.param(1).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    out.write(&(a + b).to_string())?;
    Ok(())
}

fn mul_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let a = h.param(0).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    let b = h.param(1).and_then(|v| v.value().as_f64()).unwrap_or(0.0);
    out.write(&(a * b).to_string())?;
    Ok(())
}

/// Build the per-frame render context from a computed `Layout`, the shared
/// artwork data URI, and this frame's dynamic bindings.
pub fn build_context(
    layout: &Layout,
    artwork_data_uri: &str,
    title_lines: &[String],
    podcast_name: &str,
    progress: f64,
    watermark_bar_heights: &[f64],
    caption_lines: &[String],
) -> FrameContext {
    let canvas_center_x = layout.canvas_width as f64 / 2.0;
    let progress_fill_width = layout.progress_bar_width * progress.clamp(0.0, 1.0);

    let group_x = layout.watermark_group_x(watermark_bar_heights.len());
    let watermark_bars = watermark_bar_heights
        .iter()
        .enumerate()
        .map(|(i, &height)| {
            let x = group_x + i as f64 * (layout.watermark_bar_width + layout.watermark_bar_gap);
            let y = layout.watermark_y + (layout.watermark_base_height - height);
            WatermarkBar {
                x,
                y,
                width: layout.watermark_bar_width,
                height,
                radius: layout.watermark_bar_width / 4.0,
            }
        })
        .collect();

    let caption_box_height = if caption_lines.is_empty() {
        0.0
    } else {
        layout.caption_line_height * caption_lines.len() as f64 + layout.caption_line_height
    };

    FrameContext {
        canvas_width: layout.canvas_width,
        canvas_height: layout.canvas_height,
        canvas_center_x,
        artwork_x: layout.artwork_x,
        artwork_y: layout.artwork_y,
        artwork_size: layout.artwork_size,
        artwork_data_uri: artwork_data_uri.to_string(),
        title_lines: title_lines.to_vec(),
        title_y: layout.title_y,
        title_line_height: layout.title_line_height,
        title_font_size: layout.title_line_height * 0.8,
        podcast_name: podcast_name.to_string(),
        podcast_name_y: layout.title_y + title_lines.len() as f64 * layout.title_line_height,
        podcast_name_font_size: layout.title_line_height * 0.6,
        progress_bar_x: layout.progress_bar_x,
        progress_bar_y: layout.progress_bar_y,
        progress_bar_width: layout.progress_bar_width,
        progress_bar_height: layout.progress_bar_height,
        progress_bar_radius: layout.progress_bar_height / 2.0,
        progress_fill_width,
        watermark_bars,
        caption_lines: caption_lines.to_vec(),
        caption_y: layout.caption_y,
        caption_line_height: layout.caption_line_height,
        caption_font_size: layout.caption_line_height * 0.75,
        caption_box_x: layout.side_margin * 0.6,
        caption_box_y: layout.caption_y - layout.caption_line_height,
        caption_box_width: layout.canvas_width as f64 - layout.side_margin * 1.2,
        caption_box_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_and_renders_without_error() {
        let template = FrameTemplate::compile().unwrap();
        let layout = Layout::compute();
        let ctx = build_context(
            &layout,
            "data:image/png;base64,AAAA",
            &["Episode One".to_string()],
            "Show Name",
            0.5,
            &[10.0, 20.0, 30.0, 20.0, 10.0],
            &["hello world".to_string()],
        );
        let svg = template.render(&ctx).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Episode One"));
        assert!(svg.contains("hello world"));
    }

    #[test]
    fn same_context_renders_byte_identical_svg() {
        let template = FrameTemplate::compile().unwrap();
        let layout = Layout::compute();
        let ctx = build_context(&layout, "data:x", &["T".to_string()], "P", 0.3, &[1.0; 5], &[]);
        let a = template.render(&ctx).unwrap();
        let b = template.render(&ctx).unwrap();
        assert_eq!(a, b);
    }
}
