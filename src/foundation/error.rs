/// Convenience result type used across the crate.
pub type WatermarkResult<T> = Result<T, WatermarkError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum WatermarkError {
    /// A draw call was made without a mark image.
    #[error("mark is out of range: no mark image was supplied")]
    MissingMark,

    /// Opacity outside `[0.0, 1.0]`.
    #[error("opacity is out of range: {0} (expected 0.0..=1.0)")]
    Opacity(f32),

    /// Scale ratio that is not strictly positive.
    #[error("scale_ratio is out of range: {0} (expected > 0)")]
    ScaleRatio(f32),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors raised while laying out or rasterizing text marks.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from codecs, font loading or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatermarkError {
    /// Build a [`WatermarkError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WatermarkError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// True for the three draw preconditions (missing mark, opacity, scale ratio).
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::MissingMark | Self::Opacity(_) | Self::ScaleRatio(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
