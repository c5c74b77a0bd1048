use std::collections::HashMap;

use anyhow::Context;

use crate::{
    foundation::core::{Dpi, Rgba8},
    foundation::error::{WatermarkError, WatermarkResult},
    foundation::math::unpremultiply,
    raster::image::RasterImage,
    text::font::{FontDescriptor, FontFamily},
};

#[derive(Clone)]
struct LoadedFont {
    family_name: String,
    glyphs: vello_cpu::peniko::FontData,
}

/// Lays out and rasterizes text marks.
///
/// Owns the system font database, the Parley contexts and a per-family font cache, so keep one
/// around when stamping many strings.
pub struct TextRenderer {
    fontdb: usvg::fontdb::Database,
    system_fonts_loaded: bool,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    fonts: HashMap<FontFamily, LoadedFont>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("system_fonts_loaded", &self.system_fonts_loaded)
            .field("cached_fonts", &self.fonts.len())
            .finish()
    }
}

impl TextRenderer {
    /// Construct a renderer. System fonts are scanned on first use of a non-file family.
    pub fn new() -> Self {
        Self {
            fontdb: usvg::fontdb::Database::new(),
            system_fonts_loaded: false,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// True when `family` resolves to a usable face on this machine.
    pub fn has_font(&mut self, family: &FontFamily) -> bool {
        self.font_for(family).is_ok()
    }

    /// Pixel size of the box holding `text`, truncated toward zero.
    ///
    /// `dpi` is the resolution of the image the text will land on.
    pub fn measure(&mut self, text: &str, font: &FontDescriptor, dpi: Dpi) -> WatermarkResult<(u32, u32)> {
        if text.is_empty() {
            return Ok((0, 0));
        }
        let layout = self.layout(text, font, Rgba8::BLACK, dpi)?;
        Ok(layout_box(&layout))
    }

    /// Render `text` in `color` onto a transparent buffer sized by [`TextRenderer::measure`].
    ///
    /// The buffer carries `dpi`. Empty text yields a 0×0 buffer without touching the font
    /// database.
    pub fn rasterize(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        color: Rgba8,
        dpi: Dpi,
    ) -> WatermarkResult<RasterImage> {
        if text.is_empty() {
            return Ok(RasterImage::new(0, 0, dpi));
        }

        let loaded = self.font_for(&font.family)?;
        let layout = self.layout(text, font, color, dpi)?;
        let (width, height) = layout_box(&layout);
        if width == 0 || height == 0 {
            return Ok(RasterImage::new(width, height, dpi));
        }

        let too_big = || {
            WatermarkError::render(format!(
                "text raster too large: {width}x{height} (max {m}x{m})",
                m = u16::MAX
            ))
        };
        let w16 = u16::try_from(width).map_err(|_| too_big())?;
        let h16 = u16::try_from(height).map_err(|_| too_big())?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&loaded.glyphs)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let straight: Vec<u8> = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .flat_map(|px| unpremultiply([px[0], px[1], px[2], px[3]]))
            .collect();
        let pixels = image::RgbaImage::from_raw(width, height, straight)
            .ok_or_else(|| WatermarkError::render("text pixmap size mismatch"))?;

        tracing::debug!(width, height, family = %loaded.family_name, "rasterized text mark");
        Ok(RasterImage::from_rgba(pixels, dpi))
    }

    fn layout(
        &mut self,
        text: &str,
        font: &FontDescriptor,
        color: Rgba8,
        dpi: Dpi,
    ) -> WatermarkResult<parley::Layout<Rgba8>> {
        let size_px = font.size_px(dpi.y);
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WatermarkError::validation(
                "font size must be finite and > 0",
            ));
        }

        let family_name = self.font_for(&font.family)?.family_name;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    fn font_for(&mut self, family: &FontFamily) -> WatermarkResult<LoadedFont> {
        if let Some(f) = self.fonts.get(family) {
            return Ok(f.clone());
        }

        let (bytes, index, db_family) = match family {
            FontFamily::File(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read font file '{}'", path.display()))?;
                (bytes, 0, None)
            }
            FontFamily::SansSerif => self.query_system_font(usvg::fontdb::Family::SansSerif)?,
            FontFamily::Serif => self.query_system_font(usvg::fontdb::Family::Serif)?,
            FontFamily::Monospace => self.query_system_font(usvg::fontdb::Family::Monospace)?,
            FontFamily::Named(name) => self.query_system_font(usvg::fontdb::Family::Name(name))?,
        };

        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = registered.first().map(|(id, _)| *id).ok_or_else(|| {
            WatermarkError::validation("no font families registered from font bytes")
        })?;
        let family_name = match db_family {
            Some(name) => name,
            None => self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| WatermarkError::validation("registered font family has no name"))?
                .to_string(),
        };

        let loaded = LoadedFont {
            family_name,
            glyphs: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
        };
        tracing::debug!(?family, family_name = %loaded.family_name, "loaded font");
        self.fonts.insert(family.clone(), loaded.clone());
        Ok(loaded)
    }

    fn query_system_font(
        &mut self,
        wanted: usvg::fontdb::Family<'_>,
    ) -> WatermarkResult<(Vec<u8>, u32, Option<String>)> {
        if !self.system_fonts_loaded {
            self.fontdb.load_system_fonts();
            self.system_fonts_loaded = true;
        }

        let families = [wanted];
        let query = usvg::fontdb::Query {
            families: &families,
            ..Default::default()
        };
        let id = self
            .fontdb
            .query(&query)
            .ok_or_else(|| WatermarkError::validation(format!("no system font for {wanted:?}")))?;

        let name = self
            .fontdb
            .face(id)
            .and_then(|face| face.families.first().map(|(n, _)| n.clone()));
        let (bytes, index) = self
            .fontdb
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| WatermarkError::validation(format!("font data unavailable for {wanted:?}")))?;
        Ok((bytes, index, name))
    }
}

fn layout_box(layout: &parley::Layout<Rgba8>) -> (u32, u32) {
    let mut w = 0.0f32;
    let mut h = 0.0f32;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(m.advance);
        h += m.ascent + m.descent + m.leading;
    }
    (w.max(0.0) as u32, h.max(0.0) as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/text/render.rs"]
mod tests;
