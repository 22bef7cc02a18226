//! Error types for sweep rendering.

use projection::ProjectionError;
use radar_common::{AxisKind, RadarError};
use sweep_reader::SweepReadError;
use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// Axis tagged with the given kind is absent
    #[error("Missing {0} axis")]
    MissingAxis(AxisKind),

    /// No declared data variable resolves
    #[error("Missing data variable")]
    MissingVariable,

    /// Required global attribute is absent
    #[error("Missing global attribute: {0}")]
    MissingGlobalAttribute(String),

    /// Axis cannot be used for layout
    #[error("Invalid {kind} axis: {reason}")]
    InvalidAxis { kind: AxisKind, reason: String },

    /// Explicit distance index outside the distance axis
    #[error("Distance index {index} out of range for axis of length {len}")]
    InvalidDistanceIndex { index: usize, len: usize },

    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error(transparent)]
    Radar(#[from] RadarError),

    #[error("Projection failed: {0}")]
    Projection(#[from] ProjectionError),

    /// Reader failure other than a missing axis/variable/attribute
    #[error("Dataset error: {0}")]
    Dataset(SweepReadError),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn invalid_style(msg: impl Into<String>) -> Self {
        Self::InvalidStyle(msg.into())
    }
}

impl From<SweepReadError> for RenderError {
    fn from(err: SweepReadError) -> Self {
        match err {
            SweepReadError::MissingAxis(kind) => Self::MissingAxis(kind),
            SweepReadError::MissingVariable => Self::MissingVariable,
            SweepReadError::MissingGlobalAttribute(name) => Self::MissingGlobalAttribute(name),
            other => Self::Dataset(other),
        }
    }
}
