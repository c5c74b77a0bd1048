use std::borrow::Cow;

use image::imageops;

use crate::raster::image::RasterImage;

/// Rotate/flip applied to a mark before compositing.
///
/// Rotation is clockwise and happens first; `FlipX` then mirrors the rotated mark horizontally.
/// The eight values form the symmetry group of the square, so vertical flips are expressed as
/// `Rotate180FlipX` and friends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Identity.
    #[default]
    RotateNoneFlipNone,
    /// Quarter turn clockwise.
    Rotate90FlipNone,
    /// Half turn.
    Rotate180FlipNone,
    /// Three quarter turns clockwise.
    Rotate270FlipNone,
    /// Horizontal mirror.
    RotateNoneFlipX,
    /// Quarter turn, then horizontal mirror.
    Rotate90FlipX,
    /// Half turn, then horizontal mirror (a vertical mirror).
    Rotate180FlipX,
    /// Three quarter turns, then horizontal mirror.
    Rotate270FlipX,
}

impl Orientation {
    /// All eight orientations.
    pub const ALL: [Orientation; 8] = [
        Self::RotateNoneFlipNone,
        Self::Rotate90FlipNone,
        Self::Rotate180FlipNone,
        Self::Rotate270FlipNone,
        Self::RotateNoneFlipX,
        Self::Rotate90FlipX,
        Self::Rotate180FlipX,
        Self::Rotate270FlipX,
    ];

    /// Build from clockwise quarter turns (taken mod 4) and a horizontal flip.
    pub fn from_parts(quarter_turns: i32, flip_x: bool) -> Self {
        match (quarter_turns.rem_euclid(4), flip_x) {
            (0, false) => Self::RotateNoneFlipNone,
            (1, false) => Self::Rotate90FlipNone,
            (2, false) => Self::Rotate180FlipNone,
            (3, false) => Self::Rotate270FlipNone,
            (0, true) => Self::RotateNoneFlipX,
            (1, true) => Self::Rotate90FlipX,
            (2, true) => Self::Rotate180FlipX,
            _ => Self::Rotate270FlipX,
        }
    }

    /// Clockwise quarter turns in `0..4`.
    pub fn quarter_turns(self) -> i32 {
        match self {
            Self::RotateNoneFlipNone | Self::RotateNoneFlipX => 0,
            Self::Rotate90FlipNone | Self::Rotate90FlipX => 1,
            Self::Rotate180FlipNone | Self::Rotate180FlipX => 2,
            Self::Rotate270FlipNone | Self::Rotate270FlipX => 3,
        }
    }

    /// Clockwise rotation in degrees.
    pub fn rotation_degrees(self) -> u32 {
        (self.quarter_turns() as u32) * 90
    }

    /// Whether a horizontal mirror follows the rotation.
    pub fn flips_x(self) -> bool {
        matches!(
            self,
            Self::RotateNoneFlipX | Self::Rotate90FlipX | Self::Rotate180FlipX | Self::Rotate270FlipX
        )
    }

    /// Whether width and height trade places.
    pub fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }

    /// Orientation equal to applying `self` and then `next`.
    pub fn then(self, next: Orientation) -> Orientation {
        // A mirror turns every later rotation around: R * F == F * R^-1.
        let next_turns = if self.flips_x() {
            -next.quarter_turns()
        } else {
            next.quarter_turns()
        };
        Self::from_parts(
            self.quarter_turns() + next_turns,
            self.flips_x() ^ next.flips_x(),
        )
    }

    /// Orientation that undoes `self`.
    pub fn inverse(self) -> Orientation {
        if self.flips_x() {
            self
        } else {
            Self::from_parts(-self.quarter_turns(), false)
        }
    }
}

/// Rotate and/or mirror a mark. The identity leaves the buffer (borrowed or owned) untouched.
pub fn apply_orientation(mark: Cow<'_, RasterImage>, orientation: Orientation) -> Cow<'_, RasterImage> {
    if orientation == Orientation::RotateNoneFlipNone {
        return mark;
    }

    let src = mark.pixels();
    let rotated = match orientation.quarter_turns() {
        1 => imageops::rotate90(src),
        2 => imageops::rotate180(src),
        3 => imageops::rotate270(src),
        _ => src.clone(),
    };
    let out = if orientation.flips_x() {
        imageops::flip_horizontal(&rotated)
    } else {
        rotated
    };

    let dpi = if orientation.swaps_axes() {
        mark.dpi().swapped()
    } else {
        mark.dpi()
    };
    Cow::Owned(RasterImage::from_rgba(out, dpi))
}

#[cfg(test)]
#[path = "../../tests/unit/mark/orientation.rs"]
mod tests;
