//! Rendering of radar sweeps.
//!
//! Two pipelines share the [`SweepDataset`](sweep_reader::SweepDataset) input:
//! - **Vector**: each cell becomes a geodetic quadrilateral
//!   ([`polygon`], [`feature`]) composited with one fixed style onto a canvas
//!   framed by the sweep's geographic envelope ([`scene`]).
//! - **Polar**: each cell becomes a planar sector colored by value band,
//!   painted on a sensor-centered canvas ([`polar`], [`bands`]).
//!
//! Canvases are encoded by an [`ImageEncoder`](encode::ImageEncoder); PNG is
//! built in ([`png`]).

pub mod bands;
pub mod canvas;
pub mod encode;
pub mod error;
pub mod feature;
pub mod png;
pub mod polar;
pub mod polygon;
pub mod scene;
pub mod style;

pub use bands::{band_index, ColorBands};
pub use canvas::Canvas;
pub use encode::{encode_to_file, ImageEncoder, ImageFormat, PngEncoder};
pub use error::{RenderError, RenderResult};
pub use feature::{Feature, FeatureCollection, Polygon};
pub use polar::{render_polar, PaintedSector, PolarOptions, PolarPainter, PolarRender};
pub use polygon::{build_features, DistanceSelector};
pub use scene::{render_vector, GeoTransform, SceneComposer, VectorOptions, VectorRender};
pub use style::{BandPalette, PolarStyle, SceneStyle, StyleConfig};
