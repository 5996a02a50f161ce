//! Rasterize a rendered SVG string into PNG bytes via usvg + resvg + tiny-skia.

use std::sync::{Arc, OnceLock};

use usvg::fontdb;

use crate::error::{RenderError, RenderResult};

/// Font database is expensive to build (scans system fonts) and read-only
/// once loaded; shared across every frame in the process.
fn font_db() -> &'static Arc<fontdb::Database> {
    static DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Arc::new(db)
    })
}

/// Parse `svg` and rasterize it to PNG bytes at its intrinsic size.
pub fn rasterize_svg_to_png(svg: &str) -> RenderResult<Vec<u8>> {
    let mut options = usvg::Options::default();
    options.fontdb = font_db().clone();

    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| RenderError::SvgParse(e.to_string()))?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| RenderError::SurfaceAlloc(size.width(), size.height()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| RenderError::PngEncode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterizes_a_minimal_svg() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"#;
        let png = rasterize_svg_to_png(svg).unwrap();
        assert!(!png.is_empty());
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn same_svg_rasterizes_byte_identical() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20"><circle cx="10" cy="10" r="5" fill="#00ff00"/></svg>"#;
        let a = rasterize_svg_to_png(svg).unwrap();
        let b = rasterize_svg_to_png(svg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_malformed_svg() {
        assert!(rasterize_svg_to_png("not svg at all").is_err());
    }
}
