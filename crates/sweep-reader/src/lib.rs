//! Radial sweep dataset access.
//!
//! The renderers only see a sweep through the [`SweepDataset`] trait: the
//! declared data variables, two cell-bounded axes tagged as radial azimuth
//! and radial distance, the sensor origin, and numeric global attributes.
//!
//! [`RadialSweep`] is the bundled implementation, loaded from a JSON sweep
//! document (see [`dataset`] for the layout). Binary radar formats plug in
//! by implementing the trait.

pub mod dataset;
pub mod error;

pub use dataset::{DataVariable, RadialSweep};
pub use error::{SweepReadError, SweepReadResult};

use radar_common::{AxisKind, BoundingBox, CoordinateAxis, SensorOrigin};

/// Global attribute holding the southern edge of the sweep coverage.
pub const GEOSPATIAL_LAT_MIN: &str = "geospatial_lat_min";
/// Global attribute holding the northern edge of the sweep coverage.
pub const GEOSPATIAL_LAT_MAX: &str = "geospatial_lat_max";
/// Global attribute holding the western edge of the sweep coverage.
pub const GEOSPATIAL_LON_MIN: &str = "geospatial_lon_min";
/// Global attribute holding the eastern edge of the sweep coverage.
pub const GEOSPATIAL_LON_MAX: &str = "geospatial_lon_max";
/// Global attribute with the lowest value the product can take.
pub const DATA_MIN: &str = "data_min";
/// Global attribute with the highest value the product can take.
pub const DATA_MAX: &str = "data_max";

/// Read access to one loaded radial sweep.
pub trait SweepDataset {
    /// Full names of the data variables the sweep declares, in order.
    fn data_variable_names(&self) -> Vec<String>;

    /// Resolve a data variable by full name.
    fn find_variable(&self, name: &str) -> Option<&DataVariable>;

    /// The coordinate axis tagged with `kind`, if any.
    fn find_axis(&self, kind: AxisKind) -> Option<&CoordinateAxis>;

    /// Location of the radar.
    fn common_origin(&self) -> SensorOrigin;

    /// Numeric value of a global attribute.
    fn global_attribute(&self, name: &str) -> Option<f64>;
}

/// The canonical data variable: the first declared name that resolves.
pub fn find_data_variable<D: SweepDataset + ?Sized>(dataset: &D) -> Option<&DataVariable> {
    dataset
        .data_variable_names()
        .iter()
        .find_map(|name| dataset.find_variable(name))
}

/// Like [`find_data_variable`] but failing with `MissingVariable`.
pub fn require_data_variable<D: SweepDataset + ?Sized>(
    dataset: &D,
) -> SweepReadResult<&DataVariable> {
    find_data_variable(dataset).ok_or(SweepReadError::MissingVariable)
}

pub fn require_axis<D: SweepDataset + ?Sized>(
    dataset: &D,
    kind: AxisKind,
) -> SweepReadResult<&CoordinateAxis> {
    dataset
        .find_axis(kind)
        .ok_or(SweepReadError::MissingAxis(kind))
}

/// A global attribute that must be present; no default is substituted.
pub fn require_attribute<D: SweepDataset + ?Sized>(dataset: &D, name: &str) -> SweepReadResult<f64> {
    dataset
        .global_attribute(name)
        .ok_or_else(|| SweepReadError::MissingGlobalAttribute(name.to_string()))
}

/// Coverage envelope from the four `geospatial_*` attributes.
pub fn geospatial_envelope<D: SweepDataset + ?Sized>(dataset: &D) -> SweepReadResult<BoundingBox> {
    Ok(BoundingBox::from_geospatial(
        require_attribute(dataset, GEOSPATIAL_LAT_MIN)?,
        require_attribute(dataset, GEOSPATIAL_LAT_MAX)?,
        require_attribute(dataset, GEOSPATIAL_LON_MIN)?,
        require_attribute(dataset, GEOSPATIAL_LON_MAX)?,
    ))
}

/// Declared `(data_min, data_max)` of the product.
pub fn data_range<D: SweepDataset + ?Sized>(dataset: &D) -> SweepReadResult<(f64, f64)> {
    Ok((
        require_attribute(dataset, DATA_MIN)?,
        require_attribute(dataset, DATA_MAX)?,
    ))
}
