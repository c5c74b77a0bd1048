use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Straight (non-premultiplied) RGB color, used for key colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white, the key color most logos are exported with.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn parse_hex(s: &str) -> WatermarkResult<Self> {
        let [r, g, b, a] = parse_hex_channels(s)?;
        if a != 255 {
            return Err(WatermarkError::validation(format!(
                "color '{s}' must be #rrggbb"
            )));
        }
        Ok(Self::new(r, g, b))
    }

    /// Compare against the RGB channels of a straight RGBA pixel.
    pub fn matches(self, px: [u8; 4]) -> bool {
        self.r == px[0] && self.g == px[1] && self.b == px[2]
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(c: Rgb8) -> Self {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    }
}

/// Straight RGBA8 color, used for text foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default font color.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> WatermarkResult<Self> {
        let [r, g, b, a] = parse_hex_channels(s)?;
        Ok(Self::new(r, g, b, a))
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

fn parse_hex_channels(s: &str) -> WatermarkResult<[u8; 4]> {
    let hex = s.trim().trim_start_matches('#');
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(WatermarkError::validation(format!(
            "color '{s}' must be #rrggbb or #rrggbbaa"
        )));
    }
    let mut out = [255u8; 4];
    for (i, slot) in out.iter_mut().enumerate().take(hex.len() / 2) {
        let pair = &hex[i * 2..i * 2 + 2];
        *slot = u8::from_str_radix(pair, 16)
            .map_err(|_| WatermarkError::validation(format!("invalid hex color '{s}'")))?;
    }
    Ok(out)
}

/// Empty border reserved around a mark. Non-negative by construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "MarginRepr")]
pub struct Margin {
    /// Left inset in pixels.
    pub left: u32,
    /// Top inset in pixels.
    pub top: u32,
    /// Right inset in pixels.
    pub right: u32,
    /// Bottom inset in pixels.
    pub bottom: u32,
}

impl Margin {
    /// No margin.
    pub const ZERO: Self = Self::uniform(0);

    /// Same inset on every edge.
    pub const fn uniform(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }

    /// Explicit insets.
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// True when every edge is zero.
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Total horizontal inset.
    pub fn horizontal(self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical inset.
    pub fn vertical(self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum MarginRepr {
    All(u32),
    Edges(MarginEdges),
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct MarginEdges {
    #[serde(default)]
    left: u32,
    #[serde(default)]
    top: u32,
    #[serde(default)]
    right: u32,
    #[serde(default)]
    bottom: u32,
}

impl From<MarginRepr> for Margin {
    fn from(value: MarginRepr) -> Self {
        match value {
            MarginRepr::All(v) => Margin::uniform(v),
            MarginRepr::Edges(e) => Margin::new(e.left, e.top, e.right, e.bottom),
        }
    }
}

/// Per-axis resolution in dots per inch.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dpi {
    /// Horizontal resolution.
    pub x: f32,
    /// Vertical resolution.
    pub y: f32,
}

impl Dpi {
    /// Screen resolution assumed when a codec does not report one.
    pub const DEFAULT: Self = Self { x: 96.0, y: 96.0 };

    /// Resolution with the axes exchanged (after a quarter turn).
    pub fn swapped(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integer top-left placement coordinate; may be negative or out of bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelPoint {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl PixelPoint {
    /// Build a point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
