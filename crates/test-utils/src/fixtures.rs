//! Common sweep fixtures.

use std::io::Write;
use std::path::{Path, PathBuf};

use radar_common::{AxisKind, BoundingBox, CoordinateAxis, SensorOrigin, SweepGrid};
use sweep_reader::{
    DataVariable, RadialSweep, DATA_MAX, DATA_MIN, GEOSPATIAL_LAT_MAX, GEOSPATIAL_LAT_MIN,
    GEOSPATIAL_LON_MAX, GEOSPATIAL_LON_MIN,
};

use crate::generators::create_missing_grid;

/// Envelopes as `(min_lon, min_lat, max_lon, max_lat)`.
pub mod bbox {
    /// A one-degree tile over the southern plains.
    pub const SMALL_TILE: (f64, f64, f64, f64) = (-100.0, 40.0, -99.0, 41.0);

    /// Around the equator/prime meridian crossing.
    pub const NULL_ISLAND: (f64, f64, f64, f64) = (-0.01, -0.01, 0.01, 0.01);

    /// Zero width.
    pub const DEGENERATE: (f64, f64, f64, f64) = (-100.0, 40.0, -100.0, 41.0);
}

/// Radar site locations as `(lon, lat)`.
pub mod sites {
    pub const NULL_ISLAND: (f64, f64) = (0.0, 0.0);
    pub const KTLX: (f64, f64) = (-97.2778, 35.3331);
    pub const KDVN: (f64, f64) = (-90.5809, 41.6117);
}

pub fn bounding_box(tuple: (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(tuple.0, tuple.1, tuple.2, tuple.3)
}

/// Attach the four `geospatial_*` attributes for `envelope`.
pub fn with_envelope(sweep: RadialSweep, envelope: (f64, f64, f64, f64)) -> RadialSweep {
    sweep
        .with_attribute(GEOSPATIAL_LON_MIN, envelope.0)
        .with_attribute(GEOSPATIAL_LAT_MIN, envelope.1)
        .with_attribute(GEOSPATIAL_LON_MAX, envelope.2)
        .with_attribute(GEOSPATIAL_LAT_MAX, envelope.3)
}

fn scenario_axes() -> (CoordinateAxis, CoordinateAxis) {
    let azimuth = CoordinateAxis::from_pairs(
        "azimuth",
        AxisKind::RadialAzimuth,
        &[[0.0, 10.0], [10.0, 20.0]],
    )
    .expect("azimuth axis");
    let distance = CoordinateAxis::from_pairs(
        "distance",
        AxisKind::RadialDistance,
        &[[0.0, 100.0], [100.0, 200.0]],
    )
    .expect("distance axis");
    (azimuth, distance)
}

/// The reference 2x2 sweep.
///
/// Azimuth cells `[0,10]` and `[10,20]`, distance cells `[0,100]` and
/// `[100,200]`, values `[[5, NaN], [NaN, 8]]`, data range 0..10, sensor at
/// (0, 0) and the `SMALL_TILE` envelope.
pub fn scenario_sweep() -> RadialSweep {
    let (azimuth, distance) = scenario_axes();
    let grid = SweepGrid::from_rows(&[vec![5.0, f32::NAN], vec![f32::NAN, 8.0]])
        .expect("scenario grid");
    let sweep = RadialSweep::new(SensorOrigin::new(sites::NULL_ISLAND.0, sites::NULL_ISLAND.1))
        .with_axis(azimuth)
        .with_axis(distance)
        .with_variable(DataVariable::new("Reflectivity", grid).with_units("dBZ"))
        .with_attribute(DATA_MIN, 0.0)
        .with_attribute(DATA_MAX, 10.0);
    with_envelope(sweep, bbox::SMALL_TILE)
}

/// The reference 2x2 sweep with every sample missing.
pub fn all_missing_sweep() -> RadialSweep {
    let (azimuth, distance) = scenario_axes();
    let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0))
        .with_axis(azimuth)
        .with_axis(distance)
        .with_variable(DataVariable::new("Reflectivity", create_missing_grid(2, 2)))
        .with_attribute(DATA_MIN, 0.0)
        .with_attribute(DATA_MAX, 10.0);
    with_envelope(sweep, bbox::SMALL_TILE)
}

/// The reference sweep as a JSON document.
pub const SCENARIO_JSON: &str = r#"{
  "origin": { "longitude": 0.0, "latitude": 0.0 },
  "attributes": {
    "data_min": 0.0,
    "data_max": 10.0,
    "geospatial_lat_min": 40.0,
    "geospatial_lat_max": 41.0,
    "geospatial_lon_min": -100.0,
    "geospatial_lon_max": -99.0
  },
  "axes": [
    { "name": "azimuth", "kind": "radial_azimuth", "bound1": [0.0, 10.0], "bound2": [10.0, 20.0] },
    { "name": "distance", "kind": "radial_distance", "bound1": [0.0, 100.0], "bound2": [100.0, 200.0] }
  ],
  "variables": [
    { "name": "Reflectivity", "units": "dBZ", "values": [[5.0, null], [null, 8.0]] }
  ]
}"#;

/// Write `contents` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(contents.as_bytes()).expect("write fixture");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweep_reader::{find_data_variable, geospatial_envelope, SweepDataset};

    #[test]
    fn test_scenario_sweep_matches_json() {
        let built = scenario_sweep();
        let parsed = RadialSweep::from_json(SCENARIO_JSON).unwrap();

        assert_eq!(built.common_origin(), parsed.common_origin());
        assert_eq!(
            geospatial_envelope(&built).unwrap(),
            geospatial_envelope(&parsed).unwrap()
        );
        let a = find_data_variable(&built).unwrap().read();
        let b = find_data_variable(&parsed).unwrap().read();
        assert_eq!(a.cells().collect::<Vec<_>>(), b.cells().collect::<Vec<_>>());
    }

    #[test]
    fn test_all_missing_sweep_has_no_cells() {
        let sweep = all_missing_sweep();
        let grid = find_data_variable(&sweep).unwrap().read();
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn test_write_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "sweep.json", SCENARIO_JSON);
        assert!(RadialSweep::from_json(&std::fs::read_to_string(path).unwrap()).is_ok());
    }
}
