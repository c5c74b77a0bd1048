use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::{
    foundation::core::Dpi,
    foundation::error::{WatermarkError, WatermarkResult},
    foundation::math::unpremultiply,
    raster::image::RasterImage,
};

const MAX_SVG_DIM: u32 = 16_384;

/// Decode encoded image bytes (format sniffed from content) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> WatermarkResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(RasterImage::from_dynamic(dyn_img))
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> WatermarkResult<RasterImage> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read image from '{}'", path.display()))?;
    let dyn_img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(RasterImage::from_dynamic(dyn_img))
}

/// Encode to `format`. Formats without alpha get the RGB channels only.
pub fn encode_image(img: &RasterImage, format: image::ImageFormat) -> WatermarkResult<Vec<u8>> {
    let dyn_img = image::DynamicImage::ImageRgba8(img.pixels().clone());
    let dyn_img = match format {
        image::ImageFormat::Jpeg | image::ImageFormat::Bmp | image::ImageFormat::Pnm => {
            image::DynamicImage::ImageRgb8(dyn_img.to_rgb8())
        }
        _ => dyn_img,
    };

    let mut buf = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut buf), format)
        .with_context(|| format!("encode image as {format:?}"))?;
    Ok(buf)
}

/// Encode with the format implied by the file extension and write it, creating parent dirs.
pub fn save_image(img: &RasterImage, path: impl AsRef<Path>) -> WatermarkResult<()> {
    let path = path.as_ref();
    let format = image::ImageFormat::from_path(path)
        .with_context(|| format!("output format for '{}'", path.display()))?;
    let bytes = encode_image(img, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

/// Parse an SVG document and rasterize it at `scale` times its intrinsic size.
pub fn decode_svg_mark(bytes: &[u8], scale: f32) -> WatermarkResult<RasterImage> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(WatermarkError::ScaleRatio(scale));
    }

    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let to_px = |v: f32| -> WatermarkResult<u32> {
        let px = (v * scale).ceil();
        if !px.is_finite() || px <= 0.0 {
            return Err(WatermarkError::validation("svg has invalid width/height"));
        }
        Ok((px as u32).max(1))
    };
    let (w, h) = (to_px(size.width())?, to_px(size.height())?);
    if w > MAX_SVG_DIM || h > MAX_SVG_DIM {
        return Err(WatermarkError::validation(format!(
            "svg raster size too large: {w}x{h} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| WatermarkError::render("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        w as f32 / size.width(),
        h as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let straight: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| unpremultiply([px[0], px[1], px[2], px[3]]))
        .collect();
    let pixels = image::RgbaImage::from_raw(w, h, straight)
        .ok_or_else(|| WatermarkError::render("svg pixmap size mismatch"))?;
    Ok(RasterImage::from_rgba(pixels, Dpi::DEFAULT))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
