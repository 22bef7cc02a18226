//! Tests for building geodetic sweep features.

use projection::GeodeticCalculator;
use radar_common::{AxisKind, CoordinateAxis, GeoPoint, MemorySink, NullSink, SensorOrigin, SweepGrid};
use renderer::{build_features, DistanceSelector, RenderError};
use sweep_reader::{DataVariable, RadialSweep, SweepDataset};
use test_utils::{
    all_missing_sweep, assert_approx_eq, assert_point_approx_eq, create_constant_grid,
    scenario_sweep, uniform_distance_axis,
};

#[test]
fn test_scenario_all_distances_gives_two_polygons() {
    let sweep = scenario_sweep();
    let features = build_features(&sweep, DistanceSelector::All, &mut NullSink).unwrap();

    assert_eq!(features.len(), 2);
    assert_eq!(features.schema, "Reflectivity");
    assert_eq!(features.azimuth_field, "azimuth");
    assert_eq!(features.distance_field, "distance");

    let first = &features.features[0];
    assert_eq!(first.value, 5.0);
    assert_eq!(first.azimuth, "5");
    assert_eq!(first.distance, "50");

    let second = &features.features[1];
    assert_eq!(second.value, 8.0);
    assert_eq!(second.azimuth, "15");
    assert_eq!(second.distance, "150");
}

#[test]
fn test_scenario_middle_distance_gives_one_polygon() {
    let sweep = scenario_sweep();
    let features = build_features(&sweep, DistanceSelector::Middle, &mut NullSink).unwrap();

    // Middle of a 2-bin axis is bin 1; only azimuth 1 has data there.
    assert_eq!(features.len(), 1);
    assert_eq!(features.features[0].value, 8.0);
    assert_eq!(features.features[0].distance, "150");
}

#[test]
fn test_explicit_index() {
    let sweep = scenario_sweep();
    let features = build_features(&sweep, DistanceSelector::Index(0), &mut NullSink).unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features.features[0].value, 5.0);

    let err = build_features(&sweep, DistanceSelector::Index(2), &mut NullSink).unwrap_err();
    assert!(matches!(err, RenderError::InvalidDistanceIndex { index: 2, len: 2 }));
}

#[test]
fn test_rings_are_closed_five_point_polygons() {
    let sweep = test_utils::create_reflectivity_sweep(SensorOrigin::new(-97.46, 35.33), 36, 12, 1000.0);
    let features = build_features(&sweep, DistanceSelector::All, &mut NullSink).unwrap();

    assert!(!features.is_empty());
    for feature in &features {
        let ring = feature.polygon.ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }
}

#[test]
fn test_missing_cells_are_skipped() {
    let sweep = test_utils::create_reflectivity_sweep(SensorOrigin::new(0.0, 0.0), 10, 10, 500.0);
    let grid = sweep_reader::find_data_variable(&sweep).unwrap().read().clone();
    let features = build_features(&sweep, DistanceSelector::All, &mut NullSink).unwrap();

    assert_eq!(features.len(), grid.cells().count());
    assert_eq!(features.len() + grid.missing_count(), 100);
    assert!(features.iter().all(|f| !f.value.is_nan()));
}

#[test]
fn test_corners_follow_bearing_and_distance() {
    let sweep = scenario_sweep();
    let features = build_features(&sweep, DistanceSelector::All, &mut NullSink).unwrap();
    let calc = GeodeticCalculator::new(sweep.common_origin());

    // Cell (1, 1): azimuth 10..20, distance 100..200.
    let ring = features.features[1].polygon.ring();
    let expected = [(10.0, 100.0), (10.0, 200.0), (20.0, 200.0), (20.0, 100.0)];
    for (corner, (bearing, distance)) in ring.iter().zip(expected) {
        let (b, d) = calc.bearing_distance_to(*corner).unwrap();
        assert_approx_eq!(b, bearing, 1e-5);
        assert_approx_eq!(d, distance, 1e-3);
    }

    // A zero-distance corner sits on the sensor.
    let first = features.features[0].polygon.ring();
    assert_eq!(first[0], GeoPoint::new(0.0, 0.0));
}

#[test]
fn test_azimuth_past_180_wraps() {
    let origin = SensorOrigin::new(-90.58, 41.61);
    let wrapped = CoordinateAxis::from_pairs("azimuth", AxisKind::RadialAzimuth, &[[350.0, 360.0]]).unwrap();
    let signed = CoordinateAxis::from_pairs("azimuth", AxisKind::RadialAzimuth, &[[-10.0, 0.0]]).unwrap();

    let build = |axis: CoordinateAxis| {
        let sweep = RadialSweep::new(origin)
            .with_axis(axis)
            .with_axis(uniform_distance_axis(1, 1000.0))
            .with_variable(DataVariable::new("V", create_constant_grid(1, 1, 1.0)));
        build_features(&sweep, DistanceSelector::All, &mut NullSink).unwrap()
    };

    let a = build(wrapped);
    let b = build(signed);
    for (pa, pb) in a.features[0].polygon.ring().iter().zip(b.features[0].polygon.ring()) {
        assert_point_approx_eq!(*pa, *pb, 1e-12);
    }
    // West of north stays west of the sensor.
    assert!(a.features[0].polygon.ring()[1].lon < origin.longitude);
}

#[test]
fn test_all_missing_gives_empty_collection() {
    let features = build_features(&all_missing_sweep(), DistanceSelector::All, &mut NullSink).unwrap();
    assert!(features.is_empty());
}

#[test]
fn test_missing_axis_gives_empty_collection() {
    let grid = SweepGrid::from_rows(&[vec![1.0]]).unwrap();
    let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0))
        .with_axis(uniform_distance_axis(1, 100.0))
        .with_variable(DataVariable::new("V", grid));
    let mut sink = MemorySink::default();

    let features = build_features(&sweep, DistanceSelector::Middle, &mut sink).unwrap();
    assert!(features.is_empty());
    assert!(sink.contains("missing radial axis"));
}

#[test]
fn test_missing_variable_gives_empty_collection() {
    let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0)).with_declared_variable("Phantom");
    let mut sink = MemorySink::default();

    let features = build_features(&sweep, DistanceSelector::All, &mut sink).unwrap();
    assert!(features.is_empty());
    assert!(sink.contains("no data variable"));
}

#[test]
fn test_each_feature_dumped_to_diagnostics() {
    let mut sink = MemorySink::default();
    build_features(&scenario_sweep(), DistanceSelector::All, &mut sink).unwrap();

    assert_eq!(sink.lines.len(), 2);
    assert!(sink.lines[0].starts_with("5.0 POLYGON ((0 0, "));
    assert!(sink.lines[1].starts_with("8.0 POLYGON (("));
    assert!(sink.lines[1].ends_with("))"));
}
