//! Deterministic per-frame PNG rendering (C6): a templated vector layout
//! (background, artwork, progress bar, animated watermark, caption overlay)
//! rasterized at a fixed 12 fps onto the canonical 1080x1920 canvas.
//!
//! Given identical inputs, every frame is byte-identical across runs -- no
//! wall-clock timestamps, randomness, or external state ever reach the
//! template or the rasterizer.
//!
//! ## Modules
//! - `layout` - element positions, derived once from canvas dimensions
//! - `artwork` - podcast artwork decode/resize/round-mask, embedded as a data URI
//! - `template` - the compiled Handlebars SVG template
//! - `rasterize` - usvg/resvg/tiny-skia PNG rasterization
//! - `sequence` - builds the per-job `FrameSpec` sequence
//! - `renderer` - ties the above together, fanning out across `rayon`

pub mod artwork;
pub mod error;
pub mod layout;
pub mod rasterize;
pub mod renderer;
pub mod sequence;
pub mod template;

pub use error::{RenderError, RenderResult};
pub use layout::Layout;
pub use renderer::{frame_filename, FrameRenderer, FRAME_GLOB_PATTERN};
pub use sequence::build_frame_specs;
