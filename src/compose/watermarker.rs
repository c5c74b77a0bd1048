use std::path::Path;

use crate::{
    assets::codec,
    compose::blend::{BlitRegion, composite_into},
    compose::params::DrawParams,
    foundation::error::{WatermarkError, WatermarkResult},
    layout::placement::resolve_placement,
    mark::orientation::apply_orientation,
    mark::prepare::prepare_mark,
    raster::image::RasterImage,
    text::render::TextRenderer,
};

/// Compositing engine holding an immutable original and a mutable working image.
///
/// Every draw mutates the working image in place; [`Watermarker::reset_image`] restores it from
/// the original. Draws on one instance must be serialized (they take `&mut self`); use one
/// instance per image for parallel work.
#[derive(Clone, Debug)]
pub struct Watermarker {
    original: RasterImage,
    current: RasterImage,
}

impl Watermarker {
    /// Start from an already decoded image.
    pub fn new(image: RasterImage) -> Self {
        let current = image.clone();
        Self {
            original: image,
            current,
        }
    }

    /// Start from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> WatermarkResult<Self> {
        Ok(Self::new(codec::decode_image(bytes)?))
    }

    /// Start from an image file.
    pub fn from_path(path: impl AsRef<Path>) -> WatermarkResult<Self> {
        Ok(Self::new(codec::load_image(path)?))
    }

    /// The image as it was at construction.
    pub fn original(&self) -> &RasterImage {
        &self.original
    }

    /// The working image with every mark drawn so far.
    pub fn image(&self) -> &RasterImage {
        &self.current
    }

    /// Take the working image.
    pub fn into_image(self) -> RasterImage {
        self.current
    }

    /// Discard every drawn mark.
    pub fn reset_image(&mut self) {
        self.current = self.original.clone();
    }

    /// Composite `mark` onto the working image.
    ///
    /// Pipeline: pad/scale, rotate/flip, resolve placement against the working image, blend.
    /// The mark, opacity and scale ratio are checked first, then the prepared canvas size; a
    /// failed call leaves the working image untouched. Returns the touched region, `None` when the mark is fully clipped.
    #[tracing::instrument(skip_all, fields(placement = ?params.placement, opacity = params.opacity))]
    pub fn draw_image<'m>(
        &mut self,
        mark: impl Into<Option<&'m RasterImage>>,
        params: &DrawParams,
    ) -> WatermarkResult<Option<BlitRegion>> {
        let mark = mark.into().ok_or(WatermarkError::MissingMark)?;
        params.validate()?;

        let prepared = prepare_mark(mark, params.margin, params.scale_ratio, params.scale_mode)?;
        let oriented = apply_orientation(prepared, params.orientation);

        let origin = resolve_placement(
            self.current.dimensions(),
            oriented.dimensions(),
            params.placement,
        );
        tracing::debug!(
            mark_w = oriented.width(),
            mark_h = oriented.height(),
            x = origin.x,
            y = origin.y,
            "resolved placement"
        );

        let region = composite_into(
            self.current.pixels_mut(),
            oriented.pixels(),
            origin,
            params.opacity,
            params.transparent_color,
        );
        if region.is_none() {
            tracing::debug!("mark lies outside the working image");
        }
        Ok(region)
    }

    /// Load a mark from disk and draw it.
    pub fn draw_image_path(
        &mut self,
        path: impl AsRef<Path>,
        params: &DrawParams,
    ) -> WatermarkResult<Option<BlitRegion>> {
        let mark = codec::load_image(path)?;
        self.draw_image(&mark, params)
    }

    /// Render `text` with `params.font`/`params.font_color` and draw it as an image mark.
    ///
    /// Builds a throwaway [`TextRenderer`]; prefer [`Watermarker::draw_text_with`] when stamping
    /// repeatedly.
    pub fn draw_text(
        &mut self,
        text: &str,
        params: &DrawParams,
    ) -> WatermarkResult<Option<BlitRegion>> {
        let mut renderer = TextRenderer::new();
        self.draw_text_with(&mut renderer, text, params)
    }

    /// [`Watermarker::draw_text`] with a caller-owned renderer.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn draw_text_with(
        &mut self,
        renderer: &mut TextRenderer,
        text: &str,
        params: &DrawParams,
    ) -> WatermarkResult<Option<BlitRegion>> {
        params.validate()?;
        let mark = self.text_mark(renderer, text, params)?;
        self.draw_image(&mark, params)
    }

    /// Rasterize `text` the way [`Watermarker::draw_text`] would, sized and stamped with the
    /// working image's resolution.
    pub fn text_mark(
        &self,
        renderer: &mut TextRenderer,
        text: &str,
        params: &DrawParams,
    ) -> WatermarkResult<RasterImage> {
        renderer.rasterize(text, &params.font, params.font_color, self.current.dpi())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/watermarker.rs"]
mod tests;
