//! Watermarker composites a "mark" (an image or rendered text) onto a base raster image.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: pad the mark with a [`Margin`] and scale it by `scale_ratio`
//! 2. **Orient**: rotate/flip it with one of the eight [`Orientation`] values
//! 3. **Place**: resolve a top-left coordinate from a [`Placement`] policy
//! 4. **Blend**: alpha-composite onto the working image with a global opacity, skipping pixels
//!    that match an optional key color
//!
//! Text marks go through [`TextRenderer`] first and then follow the same pipeline.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit parameters**: every draw takes a [`DrawParams`] value; the engine itself only
//!   holds the original and the working image.
//! - **Validate, then mutate**: bad input is rejected before any pixel changes; geometry that
//!   falls outside the base is clipped, never an error.
//! - **No IO in the core**: decoding and encoding live in the codec helpers ([`decode_image`],
//!   [`save_image`], ...) which callers use at the edges.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod foundation;
mod layout;
mod mark;
mod raster;
mod text;

pub use assets::codec::{decode_image, decode_svg_mark, encode_image, load_image, save_image};
pub use compose::blend::{BlitRegion, Rgba8Px, clip_region, composite_into, over_straight};
pub use compose::params::DrawParams;
pub use compose::watermarker::Watermarker;
pub use foundation::core::{Dpi, Margin, PixelPoint, Rgb8, Rgba8};
pub use foundation::error::{WatermarkError, WatermarkResult};
pub use layout::placement::{Placement, resolve_placement};
pub use mark::orientation::{Orientation, apply_orientation};
pub use mark::prepare::{ScaleMode, prepare_mark, scaled_size};
pub use raster::image::RasterImage;
pub use text::font::{FontDescriptor, FontFamily};
pub use text::render::TextRenderer;

/// Re-export of the `image` crate so callers can name formats and buffers.
pub use image;
