use std::path::PathBuf;

/// Font family selector for text marks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Generic sans-serif system face.
    #[default]
    SansSerif,
    /// Generic serif system face.
    Serif,
    /// Generic monospace system face.
    Monospace,
    /// System face looked up by family name.
    Named(String),
    /// Font file on disk (TTF/OTF/TTC, first face).
    File(PathBuf),
}

/// Family plus size in points. Points become pixels through the target image's DPI.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontDescriptor {
    /// Face selector.
    pub family: FontFamily,
    /// Em size in typographic points (1/72 inch).
    pub size_pt: f32,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: FontFamily::SansSerif,
            size_pt: 10.0,
        }
    }
}

impl FontDescriptor {
    /// Descriptor for `family` at `size_pt`.
    pub fn new(family: FontFamily, size_pt: f32) -> Self {
        Self { family, size_pt }
    }

    /// Em size in pixels at a vertical resolution of `dpi_y`.
    pub fn size_px(&self, dpi_y: f32) -> f32 {
        self.size_pt * dpi_y / 72.0
    }
}
