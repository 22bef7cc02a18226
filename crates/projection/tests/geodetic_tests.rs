//! Tests for the geodetic direct/inverse solvers.

use projection::geodetic::{Ellipsoid, GeodeticCalculator};
use projection::{destination, inverse, ProjectionError};
use radar_common::{GeoPoint, SensorOrigin};
use test_utils::assert_approx_eq;

/// Radar sites spread over latitudes, plus the null island.
const ORIGINS: &[(f64, f64)] = &[
    (0.0, 0.0),
    (-97.4606, 35.3331),  // KTLX
    (-90.5809, 41.6117),  // KDVN
    (24.8694, 60.1289),   // Vantaa
    (147.2292, -42.8375), // Hobart
];

const BEARINGS: &[f64] = &[-170.0, -90.5, -45.0, 0.0, 30.0, 89.9, 135.0, 179.5];

const DISTANCES: &[f64] = &[250.0, 1_000.0, 50_000.0, 230_000.0, 460_000.0];

#[test]
fn test_round_trip_reproduces_bearing_and_distance() {
    for &(lon, lat) in ORIGINS {
        let calc = GeodeticCalculator::new(SensorOrigin::new(lon, lat));
        for &bearing in BEARINGS {
            for &distance in DISTANCES {
                let dest = calc.destination(bearing, distance).unwrap();
                let (back_bearing, back_distance) = calc.bearing_distance_to(dest).unwrap();

                assert_approx_eq!(back_distance, distance, 1e-3);
                assert_approx_eq!(back_bearing, bearing, 1e-5);
            }
        }
    }
}

#[test]
fn test_round_trip_on_sphere() {
    let sphere = Ellipsoid::sphere(Ellipsoid::MEAN_EARTH_RADIUS);
    let calc = GeodeticCalculator::with_ellipsoid(SensorOrigin::new(-90.58, 41.61), sphere);

    for &bearing in BEARINGS {
        let dest = calc.destination(bearing, 120_000.0).unwrap();
        let (b, d) = calc.bearing_distance_to(dest).unwrap();
        assert_approx_eq!(d, 120_000.0, 1e-3);
        assert_approx_eq!(b, bearing, 1e-5);
    }
}

#[test]
fn test_free_functions_agree_with_calculator() {
    let calc = GeodeticCalculator::new(SensorOrigin::new(-90.5809, 41.6117));
    let expected = calc.destination(210.0, 75_000.0).unwrap();
    let (lon, lat) = destination(-90.5809, 41.6117, 210.0, 75_000.0).unwrap();
    assert_eq!((lon, lat), (expected.lon, expected.lat));

    let (bearing, distance) = inverse(GeoPoint::new(-90.5809, 41.6117), expected).unwrap();
    assert_approx_eq!(distance, 75_000.0, 1e-3);
    // 210 degrees comes back normalized.
    assert_approx_eq!(bearing, -150.0, 1e-5);
}

#[test]
fn test_known_distance_between_cities() {
    // Flinders Peak to Buninyong, the classic Vincenty validation pair.
    let flinders = GeoPoint::new(144.424_867_888_889, -37.951_033_416_667);
    let buninyong = GeoPoint::new(143.926_495_527_778, -37.652_821_138_889);
    let (bearing, distance) = inverse(flinders, buninyong).unwrap();

    assert_approx_eq!(distance, 54_972.271, 1e-2);
    // 306° 52' 05.37"
    assert_approx_eq!(bearing, 306.868_158 - 360.0, 1e-5);
}

#[test]
fn test_destination_moves_in_expected_quadrant() {
    let calc = GeodeticCalculator::new(SensorOrigin::new(-100.0, 40.0));
    let ne = calc.destination(45.0, 10_000.0).unwrap();
    assert!(ne.lon > -100.0 && ne.lat > 40.0);

    let sw = calc.destination(-135.0, 10_000.0).unwrap();
    assert!(sw.lon < -100.0 && sw.lat < 40.0);
}

#[test]
fn test_invalid_inputs_rejected() {
    let calc = GeodeticCalculator::new(SensorOrigin::new(0.0, 0.0));
    assert_eq!(
        calc.destination(10.0, -5.0).unwrap_err(),
        ProjectionError::NegativeDistance(-5.0)
    );
    assert!(matches!(
        calc.destination(f64::NAN, 5.0).unwrap_err(),
        ProjectionError::NonFinite(_)
    ));
    assert!(matches!(
        inverse(GeoPoint::new(0.0, 91.0), GeoPoint::new(0.0, 0.0)).unwrap_err(),
        ProjectionError::LatitudeOutOfRange(_)
    ));
}
