//! Geodetic projection of radar cells.
//!
//! Vincenty's direct and inverse solutions on an ellipsoid, used to turn
//! (bearing, distance) pairs from a sensor into longitude/latitude.

pub mod error;
pub mod geodetic;

pub use error::{ProjectionError, ProjectionResult};
pub use geodetic::{destination, inverse, Ellipsoid, GeodeticCalculator};
