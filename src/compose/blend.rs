use image::RgbaImage;

use crate::foundation::core::{PixelPoint, Rgb8};

/// Straight-alpha RGBA8 pixel.
pub type Rgba8Px = [u8; 4];

/// Source-over of a straight-alpha `src` pixel onto `dst`, with `src` alpha scaled by `opacity`.
pub fn over_straight(dst: Rgba8Px, src: Rgba8Px, opacity: f32) -> Rgba8Px {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let sa = f32::from(src[3]) / 255.0 * opacity;
    let da = f32::from(dst[3]) / 255.0;
    let inv = 1.0 - sa;
    let out_a = sa + da * inv;
    if out_a <= 0.0 {
        return dst;
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * inv) / out_a;
        out[i] = to_u8(c);
    }
    out[3] = to_u8(out_a * 255.0);
    out
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Destination rectangle actually touched by a blit, after clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitRegion {
    /// Left column in the destination.
    pub x: u32,
    /// Top row in the destination.
    pub y: u32,
    /// Clipped width.
    pub width: u32,
    /// Clipped height.
    pub height: u32,
}

/// Intersection of a `src_size` rectangle at `origin` with a `dst_size` canvas.
pub fn clip_region(dst_size: (u32, u32), src_size: (u32, u32), origin: PixelPoint) -> Option<BlitRegion> {
    let x0 = origin.x.max(0);
    let y0 = origin.y.max(0);
    let x1 = origin
        .x
        .saturating_add(i64::from(src_size.0))
        .min(i64::from(dst_size.0));
    let y1 = origin
        .y
        .saturating_add(i64::from(src_size.1))
        .min(i64::from(dst_size.1));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(BlitRegion {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Blend `src` onto `dst` with its top-left at `origin`, clipping silently.
///
/// Pixels whose RGB equals `key` are skipped outright, leaving the destination as is.
/// Returns the touched region, or `None` when the mark lies entirely outside `dst`.
pub fn composite_into(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    origin: PixelPoint,
    opacity: f32,
    key: Option<Rgb8>,
) -> Option<BlitRegion> {
    let region = clip_region(dst.dimensions(), src.dimensions(), origin)?;

    let sx0 = (i64::from(region.x) - origin.x) as u32;
    let sy0 = (i64::from(region.y) - origin.y) as u32;
    for row in 0..region.height {
        for col in 0..region.width {
            let s = src.get_pixel(sx0 + col, sy0 + row).0;
            if key.is_some_and(|k| k.matches(s)) {
                continue;
            }
            let d = dst.get_pixel_mut(region.x + col, region.y + row);
            d.0 = over_straight(d.0, s, opacity);
        }
    }
    Some(region)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
