//! Radial sweep grid: cell-bounded azimuth/distance axes and sample values.

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, RadarResult};

/// Role of a coordinate axis in a radial sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Compass bearing from the sensor, degrees.
    RadialAzimuth,
    /// Range from the sensor, meters.
    RadialDistance,
}

impl std::fmt::Display for AxisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisKind::RadialAzimuth => f.write_str("radial azimuth"),
            AxisKind::RadialDistance => f.write_str("radial distance"),
        }
    }
}

/// A cell-bounded 1-D coordinate axis.
///
/// Each index covers the interval `[bound1[i], bound2[i]]`. Coordinate names
/// are the human-readable labels attached to features; when the source does
/// not provide them they are derived from the cell midpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateAxis {
    pub name: String,
    pub kind: AxisKind,
    pub bound1: Vec<f64>,
    pub bound2: Vec<f64>,
    #[serde(default)]
    pub coord_names: Vec<String>,
}

impl CoordinateAxis {
    /// Create an axis, checking that both bound arrays have the same length.
    pub fn new(
        name: impl Into<String>,
        kind: AxisKind,
        bound1: Vec<f64>,
        bound2: Vec<f64>,
    ) -> RadarResult<Self> {
        let axis = Self {
            name: name.into(),
            kind,
            bound1,
            bound2,
            coord_names: Vec::new(),
        };
        axis.validate()?;
        Ok(axis)
    }

    /// Attach explicit per-cell coordinate names.
    pub fn with_coord_names(mut self, names: Vec<String>) -> RadarResult<Self> {
        self.coord_names = names;
        self.validate()?;
        Ok(self)
    }

    /// Build an axis from `[lower, upper]` pairs.
    pub fn from_pairs(
        name: impl Into<String>,
        kind: AxisKind,
        pairs: &[[f64; 2]],
    ) -> RadarResult<Self> {
        let bound1 = pairs.iter().map(|p| p[0]).collect();
        let bound2 = pairs.iter().map(|p| p[1]).collect();
        Self::new(name, kind, bound1, bound2)
    }

    pub fn validate(&self) -> RadarResult<()> {
        if self.bound1.len() != self.bound2.len() {
            return Err(RadarError::AxisBoundsMismatch {
                axis: self.name.clone(),
                bound1: self.bound1.len(),
                bound2: self.bound2.len(),
            });
        }
        if !self.coord_names.is_empty() && self.coord_names.len() != self.bound1.len() {
            return Err(RadarError::AxisNamesMismatch {
                axis: self.name.clone(),
                names: self.coord_names.len(),
                cells: self.bound1.len(),
            });
        }
        Ok(())
    }

    /// Number of cells along the axis.
    pub fn len(&self) -> usize {
        self.bound1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound1.is_empty()
    }

    /// `(lower, upper)` bounds of cell `index`.
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        (self.bound1[index], self.bound2[index])
    }

    /// Cell midpoint.
    pub fn coord_value(&self, index: usize) -> f64 {
        (self.bound1[index] + self.bound2[index]) / 2.0
    }

    /// Human-readable label of cell `index`.
    pub fn coord_name(&self, index: usize) -> String {
        match self.coord_names.get(index) {
            Some(name) => name.clone(),
            None => format_coord(self.coord_value(index)),
        }
    }

    /// Largest upper bound, ignoring non-finite entries.
    pub fn max_bound(&self) -> Option<f64> {
        self.bound2
            .iter()
            .copied()
            .filter(|b| b.is_finite())
            .fold(None, |acc, b| Some(acc.map_or(b, |m: f64| m.max(b))))
    }
}

fn format_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.4}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Normalize an azimuth in degrees into `(-180, 180]`.
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Geographic location of the radar for a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorOrigin {
    pub longitude: f64,
    pub latitude: f64,
}

impl SensorOrigin {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn as_point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.lon, self.lat)
    }
}

/// Sample values of one sweep, row-major with azimuth as the outer index.
///
/// NaN marks a missing sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    azimuths: usize,
    distances: usize,
    values: Vec<f32>,
}

impl SweepGrid {
    pub fn new(azimuths: usize, distances: usize, values: Vec<f32>) -> RadarResult<Self> {
        if azimuths.checked_mul(distances) != Some(values.len()) {
            return Err(RadarError::ShapeMismatch {
                azimuths,
                distances,
                values: values.len(),
            });
        }
        Ok(Self {
            azimuths,
            distances,
            values,
        })
    }

    /// Build a grid from nested rows, one row per azimuth.
    pub fn from_rows(rows: &[Vec<f32>]) -> RadarResult<Self> {
        let distances = rows.first().map_or(0, Vec::len);
        let values: Vec<f32> = rows.iter().flatten().copied().collect();
        Self::new(rows.len(), distances, values)
    }

    pub fn azimuth_count(&self) -> usize {
        self.azimuths
    }

    pub fn distance_count(&self) -> usize {
        self.distances
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Raw value of a cell, NaN included. Panics when out of range.
    pub fn value(&self, azimuth: usize, distance: usize) -> f32 {
        assert!(azimuth < self.azimuths && distance < self.distances);
        self.values[azimuth * self.distances + distance]
    }

    /// Value of a cell, or `None` when missing or out of range.
    pub fn sample(&self, azimuth: usize, distance: usize) -> Option<f32> {
        if azimuth >= self.azimuths || distance >= self.distances {
            return None;
        }
        let value = self.values[azimuth * self.distances + distance];
        (!value.is_nan()).then_some(value)
    }

    /// Non-missing cells in row-major order as `(azimuth, distance, value)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let distances = self.distances;
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(move |(i, &v)| (i / distances, i % distances, v))
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}
