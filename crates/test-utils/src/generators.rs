//! Synthetic sweep generators.
//!
//! Every generator is deterministic so tests can assert exact values.

use radar_common::{AxisKind, CoordinateAxis, SensorOrigin, SweepGrid};
use sweep_reader::{DataVariable, RadialSweep, DATA_MAX, DATA_MIN};

/// Azimuth axis of `count` equal-width cells starting at north.
///
/// # Example
///
/// ```
/// use test_utils::uniform_azimuth_axis;
///
/// let axis = uniform_azimuth_axis(360);
/// assert_eq!(axis.len(), 360);
/// assert_eq!(axis.bounds(1), (1.0, 2.0));
/// ```
pub fn uniform_azimuth_axis(count: usize) -> CoordinateAxis {
    let width = 360.0 / count.max(1) as f64;
    let bound1: Vec<f64> = (0..count).map(|i| i as f64 * width).collect();
    let bound2: Vec<f64> = (0..count).map(|i| (i + 1) as f64 * width).collect();
    CoordinateAxis {
        name: "azimuth".to_string(),
        kind: AxisKind::RadialAzimuth,
        bound1,
        bound2,
        coord_names: Vec::new(),
    }
}

/// Distance axis of `count` gates of `gate_meters` each, starting at the sensor.
pub fn uniform_distance_axis(count: usize, gate_meters: f64) -> CoordinateAxis {
    let bound1: Vec<f64> = (0..count).map(|i| i as f64 * gate_meters).collect();
    let bound2: Vec<f64> = (0..count).map(|i| (i + 1) as f64 * gate_meters).collect();
    CoordinateAxis {
        name: "distance".to_string(),
        kind: AxisKind::RadialDistance,
        bound1,
        bound2,
        coord_names: Vec::new(),
    }
}

/// Reflectivity-like grid in dBZ.
///
/// Values ramp from -30 at the sensor to 75 at the last gate, with a
/// sinusoidal ripple over azimuth. Every `hole_every`-th cell (row-major) is
/// NaN; pass 0 for no holes.
pub fn create_reflectivity_grid(azimuths: usize, distances: usize, hole_every: usize) -> SweepGrid {
    let mut values = Vec::with_capacity(azimuths * distances);
    for az in 0..azimuths {
        let ripple = ((az as f32 / azimuths.max(1) as f32) * std::f32::consts::TAU).sin() * 5.0;
        for d in 0..distances {
            let index = az * distances + d;
            if hole_every > 0 && index % hole_every == hole_every - 1 {
                values.push(f32::NAN);
                continue;
            }
            let ramp = d as f32 / distances.max(1) as f32;
            values.push((-30.0 + ramp * 105.0 + ripple).clamp(-30.0, 75.0));
        }
    }
    SweepGrid::new(azimuths, distances, values).expect("grid shape")
}

/// Grid where every sample is missing.
pub fn create_missing_grid(azimuths: usize, distances: usize) -> SweepGrid {
    SweepGrid::new(azimuths, distances, vec![f32::NAN; azimuths * distances])
        .expect("grid shape")
}

/// Grid where every sample holds `value`.
pub fn create_constant_grid(azimuths: usize, distances: usize, value: f32) -> SweepGrid {
    SweepGrid::new(azimuths, distances, vec![value; azimuths * distances])
        .expect("grid shape")
}

/// A full synthetic sweep: uniform axes, a reflectivity grid and a
/// `data_min`/`data_max` of -30..75 dBZ.
pub fn create_reflectivity_sweep(
    origin: SensorOrigin,
    azimuths: usize,
    distances: usize,
    gate_meters: f64,
) -> RadialSweep {
    let grid = create_reflectivity_grid(azimuths, distances, 7);
    RadialSweep::new(origin)
        .with_axis(uniform_azimuth_axis(azimuths))
        .with_axis(uniform_distance_axis(distances, gate_meters))
        .with_variable(DataVariable::new("Reflectivity", grid).with_units("dBZ"))
        .with_attribute(DATA_MIN, -30.0)
        .with_attribute(DATA_MAX, 75.0)
}
