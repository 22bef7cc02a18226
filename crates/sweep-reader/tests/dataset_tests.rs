//! Loading sweep documents and resolving variables, axes and attributes.

use std::io::Write;

use radar_common::{AxisKind, MemorySink, SensorOrigin};
use sweep_reader::{
    data_range, find_data_variable, geospatial_envelope, require_attribute, require_axis,
    RadialSweep, SweepDataset, SweepReadError, DATA_MAX, DATA_MIN,
};
use tempfile::NamedTempFile;

const SCENARIO: &str = r#"{
  "origin": { "longitude": 0.0, "latitude": 0.0 },
  "attributes": {
    "data_min": 0,
    "data_max": 10.0,
    "geospatial_lat_min": 40.0,
    "geospatial_lat_max": 41.0,
    "geospatial_lon_min": -100.0,
    "geospatial_lon_max": "-99.0",
    "instrument_name": "KTLX"
  },
  "axes": [
    { "name": "azimuth", "kind": "radial_azimuth", "bound1": [0.0, 10.0], "bound2": [10.0, 20.0] },
    { "name": "distance", "kind": "radial_distance", "bound1": [0.0, 100.0], "bound2": [100.0, 200.0] }
  ],
  "variables": [
    { "name": "Reflectivity", "units": "dBZ", "values": [[5.0, null], [null, 8.0]] }
  ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_open_scenario_document() {
    let file = write_temp(SCENARIO);
    let mut sink = MemorySink::default();
    let sweep = RadialSweep::open(file.path(), &mut sink).unwrap();

    assert!(sink.contains("opened"));
    assert_eq!(sweep.common_origin(), SensorOrigin::new(0.0, 0.0));
    assert_eq!(sweep.data_variable_names(), vec!["Reflectivity".to_string()]);

    let variable = find_data_variable(&sweep).unwrap();
    assert_eq!(variable.units(), Some("dBZ"));
    let grid = variable.read();
    assert_eq!(grid.sample(0, 0), Some(5.0));
    assert_eq!(grid.sample(0, 1), None);
    assert_eq!(grid.sample(1, 1), Some(8.0));

    let azimuth = require_axis(&sweep, AxisKind::RadialAzimuth).unwrap();
    assert_eq!(azimuth.bounds(1), (10.0, 20.0));
}

#[test]
fn test_attributes_and_envelope() {
    let sweep = RadialSweep::from_json(SCENARIO).unwrap();

    assert_eq!(data_range(&sweep).unwrap(), (0.0, 10.0));
    // Text attributes that parse as numbers count as numeric.
    assert_eq!(sweep.global_attribute("geospatial_lon_max"), Some(-99.0));
    assert_eq!(sweep.global_attribute("instrument_name"), None);

    let envelope = geospatial_envelope(&sweep).unwrap();
    assert_eq!(envelope.min_x, -100.0);
    assert_eq!(envelope.max_x, -99.0);
    assert_eq!(envelope.min_y, 40.0);
    assert_eq!(envelope.max_y, 41.0);
}

#[test]
fn test_missing_attribute_is_an_error() {
    let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0)).with_attribute(DATA_MIN, 1.0);
    match require_attribute(&sweep, DATA_MAX) {
        Err(SweepReadError::MissingGlobalAttribute(name)) => assert_eq!(name, "data_max"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        geospatial_envelope(&sweep),
        Err(SweepReadError::MissingGlobalAttribute(_))
    ));
}

#[test]
fn test_first_resolvable_declared_variable_wins() {
    let doc = r#"{
      "origin": { "longitude": 1.0, "latitude": 2.0 },
      "data_variables": ["Phantom", "Velocity", "Reflectivity"],
      "variables": [
        { "name": "Reflectivity", "values": [[1.0]] },
        { "name": "Velocity", "values": [[2.0]] }
      ]
    }"#;
    let sweep = RadialSweep::from_json(doc).unwrap();
    assert_eq!(find_data_variable(&sweep).unwrap().name(), "Velocity");
}

#[test]
fn test_no_resolvable_variable() {
    let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0)).with_declared_variable("Phantom");
    assert!(find_data_variable(&sweep).is_none());
    assert!(matches!(
        sweep_reader::require_data_variable(&sweep),
        Err(SweepReadError::MissingVariable)
    ));
}

#[test]
fn test_missing_axis_reported_by_kind() {
    let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0));
    match require_axis(&sweep, AxisKind::RadialDistance) {
        Err(SweepReadError::MissingAxis(kind)) => assert_eq!(kind, AxisKind::RadialDistance),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_variable_shape_must_match_axes() {
    let doc = r#"{
      "origin": { "longitude": 0.0, "latitude": 0.0 },
      "axes": [
        { "name": "azimuth", "kind": "radial_azimuth", "bound1": [0.0, 10.0], "bound2": [10.0, 20.0] }
      ],
      "variables": [ { "name": "Reflectivity", "values": [[1.0, 2.0]] } ]
    }"#;
    assert!(matches!(
        RadialSweep::from_json(doc),
        Err(SweepReadError::InvalidData(_))
    ));
}

#[test]
fn test_ragged_rows_rejected() {
    let doc = r#"{
      "origin": { "longitude": 0.0, "latitude": 0.0 },
      "variables": [ { "name": "Reflectivity", "values": [[1.0, 2.0], [3.0]] } ]
    }"#;
    assert!(matches!(
        RadialSweep::from_json(doc),
        Err(SweepReadError::InvalidData(_))
    ));
}

#[test]
fn test_open_missing_file_reports_to_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let mut sink = MemorySink::default();

    let err = RadialSweep::open(&path, &mut sink).unwrap_err();
    assert!(matches!(err, SweepReadError::Io(_)));
    assert!(sink.contains("failed to open"));
}

#[test]
fn test_malformed_json() {
    let file = write_temp("{ not json");
    let err = RadialSweep::open(file.path(), &mut MemorySink::default()).unwrap_err();
    assert!(matches!(err, SweepReadError::Parse(_)));
}
