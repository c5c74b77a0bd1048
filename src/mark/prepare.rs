use std::borrow::Cow;

use image::{RgbaImage, imageops};

use crate::{
    foundation::core::Margin,
    foundation::error::{WatermarkError, WatermarkResult},
    foundation::math::round_ties_even_u32,
    raster::image::RasterImage,
};

/// Upper bound on the pixel count of a prepared mark canvas (1 GiB of RGBA8).
const MAX_MARK_PIXELS: u64 = 1 << 28;

/// How a non-unit scale ratio affects the mark pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// Resample the whole mark into the scaled rectangle.
    #[default]
    Resample,
    /// Size the canvas for the scaled mark but copy the pixels unscaled, clipped to the scaled
    /// rectangle. Scaling then only grows (or crops) the canvas.
    CanvasOnly,
}

/// Scaled size of a mark, rounding half to even.
pub fn scaled_size(width: u32, height: u32, scale_ratio: f32) -> (u32, u32) {
    let s = f64::from(scale_ratio);
    (
        round_ties_even_u32(f64::from(width) * s),
        round_ties_even_u32(f64::from(height) * s),
    )
}

/// Pad and/or scale `mark` onto a fresh transparent canvas.
///
/// The canvas is `(scaled + margins)` in size and the mark lands at `(margin.left, margin.top)`.
/// With zero margin and a ratio of exactly `1.0` the input is returned borrowed, untouched.
/// `scale_ratio` must already be validated as `> 0`. A canvas larger than the allocation cap is
/// a validation error, reported before anything is allocated.
pub fn prepare_mark(
    mark: &RasterImage,
    margin: Margin,
    scale_ratio: f32,
    mode: ScaleMode,
) -> WatermarkResult<Cow<'_, RasterImage>> {
    if margin.is_zero() && scale_ratio == 1.0 {
        return Ok(Cow::Borrowed(mark));
    }

    let (new_w, new_h) = scaled_size(mark.width(), mark.height(), scale_ratio);
    let (canvas_w, canvas_h) = canvas_size(new_w, new_h, margin)?;
    let mut canvas = RgbaImage::new(canvas_w, canvas_h);

    if new_w > 0 && new_h > 0 && !mark.is_empty() {
        let left = i64::from(margin.left);
        let top = i64::from(margin.top);
        match mode {
            ScaleMode::Resample => {
                let scaled = if (new_w, new_h) == mark.dimensions() {
                    mark.pixels().clone()
                } else {
                    imageops::resize(mark.pixels(), new_w, new_h, imageops::FilterType::Triangle)
                };
                imageops::replace(&mut canvas, &scaled, left, top);
            }
            ScaleMode::CanvasOnly => {
                let cw = mark.width().min(new_w);
                let ch = mark.height().min(new_h);
                let clipped = imageops::crop_imm(mark.pixels(), 0, 0, cw, ch).to_image();
                imageops::replace(&mut canvas, &clipped, left, top);
            }
        }
    }

    tracing::debug!(
        src_w = mark.width(),
        src_h = mark.height(),
        out_w = canvas.width(),
        out_h = canvas.height(),
        ?mode,
        "prepared mark"
    );

    Ok(Cow::Owned(RasterImage::from_rgba(canvas, mark.dpi())))
}

fn canvas_size(new_w: u32, new_h: u32, margin: Margin) -> WatermarkResult<(u32, u32)> {
    let too_big = || {
        WatermarkError::validation(format!(
            "prepared mark too large: {new_w}x{new_h} plus margin {margin:?} \
             (max {MAX_MARK_PIXELS} pixels)"
        ))
    };
    let w = u64::from(new_w) + u64::from(margin.left) + u64::from(margin.right);
    let h = u64::from(new_h) + u64::from(margin.top) + u64::from(margin.bottom);
    let pixels = w.checked_mul(h).ok_or_else(too_big)?;
    if pixels > MAX_MARK_PIXELS {
        return Err(too_big());
    }
    let bytes = pixels.checked_mul(4).ok_or_else(too_big)?;
    if usize::try_from(bytes).is_err() {
        return Err(too_big());
    }
    Ok((
        u32::try_from(w).map_err(|_| too_big())?,
        u32::try_from(h).map_err(|_| too_big())?,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/mark/prepare.rs"]
mod tests;
