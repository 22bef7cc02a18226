//! Common types shared across the radar sweep rendering crates.

pub mod bbox;
pub mod color;
pub mod diagnostics;
pub mod error;
pub mod grid;

pub use bbox::BoundingBox;
pub use color::Color;
pub use diagnostics::{DiagnosticSink, MemorySink, NullSink, TracingSink, WriterSink};
pub use error::{RadarError, RadarResult};
pub use grid::{normalize_azimuth, AxisKind, CoordinateAxis, GeoPoint, SensorOrigin, SweepGrid};
