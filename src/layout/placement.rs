use crate::foundation::core::PixelPoint;

/// Where a mark is anchored on the base image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Explicit top-left coordinate; may be negative or past the base edges.
    Absolute {
        /// Column of the mark's top-left pixel.
        x: i64,
        /// Row of the mark's top-left pixel.
        y: i64,
    },
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Centered along the top edge.
    TopMiddle,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Centered along the bottom edge.
    BottomMiddle,
    /// Centered along the left edge.
    MiddleLeft,
    /// Centered along the right edge.
    MiddleRight,
    /// Centered on both axes.
    Center,
}

impl Default for Placement {
    fn default() -> Self {
        Self::Absolute { x: 0, y: 0 }
    }
}

impl Placement {
    /// The nine anchored policies (everything but [`Placement::Absolute`]).
    pub const ALL_ANCHORED: [Placement; 9] = [
        Self::TopLeft,
        Self::TopRight,
        Self::TopMiddle,
        Self::BottomLeft,
        Self::BottomRight,
        Self::BottomMiddle,
        Self::MiddleLeft,
        Self::MiddleRight,
        Self::Center,
    ];

    /// Parse a snake_case anchor name (`"center"`, `"bottom_right"`, ...).
    pub fn from_anchor_name(name: &str) -> Option<Self> {
        let p = match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "top_left" => Self::TopLeft,
            "top_right" => Self::TopRight,
            "top_middle" => Self::TopMiddle,
            "bottom_left" => Self::BottomLeft,
            "bottom_right" => Self::BottomRight,
            "bottom_middle" => Self::BottomMiddle,
            "middle_left" => Self::MiddleLeft,
            "middle_right" => Self::MiddleRight,
            "center" => Self::Center,
            _ => return None,
        };
        Some(p)
    }

    fn anchors(self) -> (Align, Align) {
        match self {
            Self::Absolute { .. } | Self::TopLeft => (Align::Start, Align::Start),
            Self::TopRight => (Align::End, Align::Start),
            Self::TopMiddle => (Align::Middle, Align::Start),
            Self::BottomLeft => (Align::Start, Align::End),
            Self::BottomRight => (Align::End, Align::End),
            Self::BottomMiddle => (Align::Middle, Align::End),
            Self::MiddleLeft => (Align::Start, Align::Middle),
            Self::MiddleRight => (Align::End, Align::Middle),
            Self::Center => (Align::Middle, Align::Middle),
        }
    }
}

#[derive(Clone, Copy)]
enum Align {
    Start,
    Middle,
    End,
}

fn align_offset(container: u32, content: u32, align: Align) -> i64 {
    // No clamping: a mark wider than the base gets a negative offset.
    let rem = i64::from(container) - i64::from(content);
    match align {
        Align::Start => 0,
        Align::Middle => rem / 2,
        Align::End => rem,
    }
}

/// Top-left coordinate for a `mark` of the given size on a `base` of the given size.
pub fn resolve_placement(base: (u32, u32), mark: (u32, u32), placement: Placement) -> PixelPoint {
    if let Placement::Absolute { x, y } = placement {
        return PixelPoint::new(x, y);
    }
    let (ax, ay) = placement.anchors();
    PixelPoint::new(
        align_offset(base.0, mark.0, ax),
        align_offset(base.1, mark.1, ay),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
