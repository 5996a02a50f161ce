//! Podcast artwork preparation: decode once per job, resize to the layout's
//! artwork slot, and mask to rounded corners. The result is embedded as a
//! base64 PNG data URI directly into the per-frame SVG so rasterization
//! stays a single deterministic pass.

use base64::Engine;
use image::{GenericImageView, ImageBuffer, Rgba};

use crate::error::{RenderError, RenderResult};

const CORNER_RADIUS_FRACTION: f64 = 0.06;

/// Decode, resize, and round-mask artwork bytes into a base64 PNG data URI
/// sized to `size`x`size` canvas pixels.
pub fn prepare_artwork_data_uri(raw_bytes: &[u8], size: u32) -> RenderResult<String> {
    let decoded = image::load_from_memory(raw_bytes).map_err(|e| RenderError::ArtworkDecode(e.to_string()))?;
    let resized = decoded.resize_to_fill(size, size, image::imageops::FilterType::Lanczos3);

    let masked = apply_rounded_corners(&resized, size as f64 * CORNER_RADIUS_FRACTION);

    let mut png_bytes = Vec::new();
    masked
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), image::ImageOutputFormat::Png)
        .map_err(|e| RenderError::PngEncode(e.to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&png_bytes);
    Ok(format!("data:image/png;base64,{encoded}"))
}

fn apply_rounded_corners(img: &image::DynamicImage, radius: f64) -> image::DynamicImage {
    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();
    let mut out: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let mut p = *pixel;
        if let Some(alpha_scale) = corner_alpha_scale(x, y, width, height, radius) {
            p[3] = (p[3] as f64 * alpha_scale).round() as u8;
        }
        out.put_pixel(x, y, p);
    }

    image::DynamicImage::ImageRgba8(out)
}

/// Returns `Some(scale)` only near a corner, where `scale` fades alpha to 0
/// outside the rounded-rect boundary. `None` means "inside the straight
/// edges, leave alpha untouched" (cheap common case).
fn corner_alpha_scale(x: u32, y: u32, width: u32, height: u32, radius: f64) -> Option<f64> {
    let (cx, cy, corner_x, corner_y) = nearest_corner_center(x, y, width, height, radius)?;
    let dx = corner_x - cx;
    let dy = corner_y - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= radius {
        Some(1.0)
    } else if dist <= radius + 1.0 {
        Some((radius + 1.0 - dist).max(0.0))
    } else {
        Some(0.0)
    }
}

fn nearest_corner_center(x: u32, y: u32, width: u32, height: u32, radius: f64) -> Option<(f64, f64, f64, f64)> {
    let r = radius.ceil() as i64;
    let (x, y, width, height) = (x as i64, y as i64, width as i64, height as i64);

    let near_left = x < r;
    let near_right = x >= width - r;
    let near_top = y < r;
    let near_bottom = y >= height - r;

    if !(near_left || near_right) || !(near_top || near_bottom) {
        return None;
    }

    let corner_cx = if near_left { radius } else { width as f64 - radius };
    let corner_cy = if near_top { radius } else { height as f64 - radius };
    Some((x as f64, y as f64, corner_cx, corner_cy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_png(size: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(size, size, Rgba([255u8, 0, 0, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn produces_a_valid_data_uri() {
        let uri = prepare_artwork_data_uri(&solid_png(64), 64).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn corners_are_fully_transparent_at_the_extreme_pixel() {
        let scale = corner_alpha_scale(0, 0, 100, 100, 10.0).unwrap();
        assert!(scale < 0.5, "pixel at the very corner should be mostly transparent");
    }

    #[test]
    fn center_pixel_is_untouched() {
        assert!(corner_alpha_scale(50, 50, 100, 100, 10.0).is_none());
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let err = prepare_artwork_data_uri(b"not an image", 64).unwrap_err();
        assert!(matches!(err, RenderError::ArtworkDecode(_)));
    }
}
