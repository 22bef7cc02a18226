//! Error types for geodetic computations.

use thiserror::Error;

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// Distances along the geodesic must be >= 0
    #[error("negative geodesic distance: {0} m")]
    NegativeDistance(f64),

    #[error("non-finite {0}")]
    NonFinite(&'static str),

    #[error("latitude out of range: {0}")]
    LatitudeOutOfRange(f64),

    /// Vincenty iteration did not settle (nearly antipodal points)
    #[error("geodesic failed to converge after {iterations} iterations")]
    NoConvergence { iterations: usize },
}
