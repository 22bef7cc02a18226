//! Error types for sweep dataset reading.

use radar_common::{AxisKind, RadarError};
use thiserror::Error;

/// Result type for sweep reader operations.
pub type SweepReadResult<T> = Result<T, SweepReadError>;

/// Error types for sweep reading.
#[derive(Error, Debug)]
pub enum SweepReadError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid sweep JSON
    #[error("Invalid sweep document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Shape or axis invariant violated
    #[error("Invalid sweep data: {0}")]
    InvalidData(#[from] RadarError),

    /// Axis tagged with the given kind is absent
    #[error("Missing {0} axis")]
    MissingAxis(AxisKind),

    /// No declared data variable resolves
    #[error("Missing data variable")]
    MissingVariable,

    /// Required global attribute is absent or not numeric
    #[error("Missing global attribute: {0}")]
    MissingGlobalAttribute(String),
}
