//! Error types for radar sweep rendering.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Errors raised while validating sweep data and shared geometry types.
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("grid shape mismatch: {azimuths} azimuths x {distances} distances != {values} values")]
    ShapeMismatch {
        azimuths: usize,
        distances: usize,
        values: usize,
    },

    #[error("axis '{axis}' has {bound1} lower bounds but {bound2} upper bounds")]
    AxisBoundsMismatch {
        axis: String,
        bound1: usize,
        bound2: usize,
    },

    #[error("axis '{axis}' has {names} coordinate names for {cells} cells")]
    AxisNamesMismatch {
        axis: String,
        names: usize,
        cells: usize,
    },

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl RadarError {
    /// Create an InvalidBbox error.
    pub fn invalid_bbox(msg: impl Into<String>) -> Self {
        Self::InvalidBbox(msg.into())
    }

    /// Create an InvalidColor error.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }
}
