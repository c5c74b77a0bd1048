use image::{DynamicImage, RgbaImage};

use crate::foundation::core::Dpi;

/// Rectangular straight-alpha RGBA8 pixel grid with per-axis resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pixels: RgbaImage,
    dpi: Dpi,
}

impl RasterImage {
    /// Fully transparent image of the given size.
    pub fn new(width: u32, height: u32, dpi: Dpi) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            dpi,
        }
    }

    /// Wrap an existing straight-alpha buffer.
    pub fn from_rgba(pixels: RgbaImage, dpi: Dpi) -> Self {
        Self { pixels, dpi }
    }

    /// Convert any decoded image to RGBA8 at the default resolution.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        Self::from_rgba(img.into_rgba8(), Dpi::DEFAULT)
    }

    /// Single-color image, handy for solid marks.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4], dpi: Dpi) -> Self {
        Self::from_rgba(
            RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
            dpi,
        )
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// True when the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Resolution metadata.
    pub fn dpi(&self) -> Dpi {
        self.dpi
    }

    /// Replace resolution metadata.
    pub fn set_dpi(&mut self, dpi: Dpi) {
        self.dpi = dpi;
    }

    /// Builder form of [`RasterImage::set_dpi`].
    pub fn with_dpi(mut self, dpi: Dpi) -> Self {
        self.dpi = dpi;
        self
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mutably borrow the pixel buffer. Dimensions cannot change through this handle.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Straight RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Give up the pixel buffer.
    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }

    /// Give up the pixel buffer as a [`DynamicImage`] for encoding.
    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.pixels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
