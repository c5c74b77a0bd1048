use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::{Margin, Rgb8, Rgba8},
    foundation::error::{WatermarkError, WatermarkResult},
    layout::placement::Placement,
    mark::orientation::Orientation,
    mark::prepare::ScaleMode,
    text::font::FontDescriptor,
};

/// Everything a single draw call needs besides the mark itself.
///
/// Passed by reference into each draw, so a call sees exactly the values it was given.
/// Deserializes from JSON with every field optional.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawParams {
    /// Global alpha multiplier in `[0.0, 1.0]`.
    pub opacity: f32,
    /// Mark scale factor, `> 0`.
    pub scale_ratio: f32,
    /// How a non-unit `scale_ratio` treats the mark pixels.
    pub scale_mode: ScaleMode,
    /// Mark pixels of exactly this RGB are never drawn.
    pub transparent_color: Option<Rgb8>,
    /// Rotate/flip applied after scaling and padding.
    pub orientation: Orientation,
    /// Empty border reserved around the mark.
    pub margin: Margin,
    /// Anchor policy on the working image.
    pub placement: Placement,
    /// Font for text marks.
    pub font: FontDescriptor,
    /// Foreground color for text marks.
    pub font_color: Rgba8,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale_ratio: 1.0,
            scale_mode: ScaleMode::Resample,
            transparent_color: None,
            orientation: Orientation::RotateNoneFlipNone,
            margin: Margin::ZERO,
            placement: Placement::default(),
            font: FontDescriptor::default(),
            font_color: Rgba8::BLACK,
        }
    }
}

impl DrawParams {
    /// Parse from a JSON document.
    pub fn from_json_str(s: &str) -> WatermarkResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| WatermarkError::validation(format!("invalid draw params: {e}")))
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> WatermarkResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read draw params from '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Opacity and scale checks run before every draw.
    pub fn validate(&self) -> WatermarkResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::Opacity(self.opacity));
        }
        if !(self.scale_ratio > 0.0 && self.scale_ratio.is_finite()) {
            return Err(WatermarkError::ScaleRatio(self.scale_ratio));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/params.rs"]
mod tests;
