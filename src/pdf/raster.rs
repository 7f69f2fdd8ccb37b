use anyhow::{Result, anyhow};
use gpui::RenderImage;
use image::{Frame, RgbaImage};
use std::sync::Arc;

/// Converts an RGBA raster into an image gpui can paint. gpui expects BGRA
/// byte order.
pub fn to_render_image(raster: &RgbaImage) -> Result<Arc<RenderImage>> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow!("empty raster {width}x{height}"));
    }

    let bgra = RgbaImage::from_raw(width, height, rgba_to_bgra(raster.as_raw().clone()))
        .ok_or_else(|| anyhow!("raster buffer does not match {width}x{height}"))?;

    Ok(Arc::new(RenderImage::new([Frame::new(bgra)])))
}

fn rgba_to_bgra(mut rgba: Vec<u8>) -> Vec<u8> {
    for pixel in rgba.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
    rgba
}
