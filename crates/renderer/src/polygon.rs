//! Geodetic quadrilaterals for sweep cells.
//!
//! Each selected cell becomes a ring of four corners projected from the
//! sensor along the cell's azimuth bounds:
//!
//! ```text
//! (az_from, d_from) -> (az_from, d_to) -> (az_to, d_to) -> (az_to, d_from) -> back
//! ```

use std::fmt;
use std::str::FromStr;

use projection::GeodeticCalculator;
use radar_common::{diag, normalize_azimuth, AxisKind, DiagnosticSink, RadarError};
use serde::{Deserialize, Serialize};
use sweep_reader::{find_data_variable, SweepDataset};
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::feature::{Feature, FeatureCollection, Polygon};

/// Which distance bins of each azimuth get a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSelector {
    /// The single bin at `len / 2`.
    #[default]
    Middle,
    /// Every bin.
    All,
    /// One explicit bin.
    Index(usize),
}

impl DistanceSelector {
    /// Distance indices selected on an axis of `len` bins.
    pub fn indices(&self, len: usize) -> RenderResult<std::ops::Range<usize>> {
        match *self {
            Self::Middle if len == 0 => Ok(0..0),
            Self::Middle => Ok(len / 2..len / 2 + 1),
            Self::All => Ok(0..len),
            Self::Index(index) if index < len => Ok(index..index + 1),
            Self::Index(index) => Err(RenderError::InvalidDistanceIndex { index, len }),
        }
    }
}

impl fmt::Display for DistanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Middle => f.write_str("middle"),
            Self::All => f.write_str("all"),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl FromStr for DistanceSelector {
    type Err = String;

    /// `middle`, `all`, or a bin index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "middle" => Ok(Self::Middle),
            "all" => Ok(Self::All),
            other => other
                .parse::<usize>()
                .map(Self::Index)
                .map_err(|_| format!("invalid distance selector '{}': expected middle, all or an index", s)),
        }
    }
}

/// Build one feature per selected, non-missing cell.
///
/// A sweep without a resolvable data variable or without either radial axis
/// yields an empty collection. Every feature is also written to
/// `diagnostics` as `<value> <WKT>`.
pub fn build_features(
    dataset: &dyn SweepDataset,
    selector: DistanceSelector,
    diagnostics: &mut dyn DiagnosticSink,
) -> RenderResult<FeatureCollection> {
    let Some(variable) = find_data_variable(dataset) else {
        diag!(diagnostics, "no data variable; nothing to draw");
        return Ok(FeatureCollection::empty());
    };
    let (Some(azimuth_axis), Some(distance_axis)) = (
        dataset.find_axis(AxisKind::RadialAzimuth),
        dataset.find_axis(AxisKind::RadialDistance),
    ) else {
        diag!(diagnostics, "missing radial axis; nothing to draw");
        return Ok(FeatureCollection::empty());
    };

    let grid = variable.read();
    if grid.azimuth_count() != azimuth_axis.len() || grid.distance_count() != distance_axis.len() {
        return Err(RadarError::ShapeMismatch {
            azimuths: azimuth_axis.len(),
            distances: distance_axis.len(),
            values: grid.values().len(),
        }
        .into());
    }

    let distances = selector.indices(distance_axis.len())?;
    let calc = GeodeticCalculator::new(dataset.common_origin());
    let mut collection = FeatureCollection::new(
        variable.short_name(),
        azimuth_axis.name.clone(),
        distance_axis.name.clone(),
    );

    for az in 0..azimuth_axis.len() {
        let (az_from, az_to) = azimuth_axis.bounds(az);
        let az_from = normalize_azimuth(az_from);
        let az_to = normalize_azimuth(az_to);

        for d in distances.clone() {
            let Some(value) = grid.sample(az, d) else {
                continue;
            };
            let (d_from, d_to) = distance_axis.bounds(d);
            let polygon = Polygon::from_corners([
                calc.destination(az_from, d_from)?,
                calc.destination(az_from, d_to)?,
                calc.destination(az_to, d_to)?,
                calc.destination(az_to, d_from)?,
            ]);
            diag!(diagnostics, "{:?} {}", value, polygon);

            collection.features.push(Feature {
                azimuth: azimuth_axis.coord_name(az),
                distance: distance_axis.coord_name(d),
                value,
                polygon,
            });
        }
    }

    debug!(
        features = collection.len(),
        selector = %selector,
        "Built sweep features"
    );
    Ok(collection)
}
