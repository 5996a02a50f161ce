//! Frame renderer error types.

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to decode artwork: {0}")]
    ArtworkDecode(String),

    #[error("failed to render caption template: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("failed to register caption template: {0}")]
    TemplateRegister(#[from] handlebars::TemplateError),

    #[error("failed to parse generated SVG: {0}")]
    SvgParse(String),

    #[error("failed to allocate rasterization surface for {0}x{1}")]
    SurfaceAlloc(u32, u32),

    #[error("failed to encode PNG: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
