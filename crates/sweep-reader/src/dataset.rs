//! JSON-backed radial sweep.
//!
//! A sweep document looks like:
//!
//! ```json
//! {
//!   "origin": { "longitude": -97.46, "latitude": 35.33 },
//!   "attributes": { "data_min": -32.0, "data_max": 94.5, "geospatial_lat_min": 33.2 },
//!   "data_variables": ["Reflectivity"],
//!   "axes": [
//!     { "name": "azimuth", "kind": "radial_azimuth", "bound1": [0.0], "bound2": [1.0] },
//!     { "name": "distance", "kind": "radial_distance", "bound1": [0.0], "bound2": [250.0] }
//!   ],
//!   "variables": [
//!     { "name": "Reflectivity", "units": "dBZ", "values": [[12.5]] }
//!   ]
//! }
//! ```
//!
//! `null` samples are missing. `data_variables` defaults to the names in
//! `variables`; it may also list names that have no data, which resolve to
//! nothing.

use std::collections::BTreeMap;
use std::path::Path;

use radar_common::{diag, AxisKind, CoordinateAxis, DiagnosticSink, RadarError, SensorOrigin, SweepGrid};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{SweepReadError, SweepReadResult};
use crate::SweepDataset;

/// A named sample grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVariable {
    name: String,
    units: Option<String>,
    grid: SweepGrid,
}

impl DataVariable {
    pub fn new(name: impl Into<String>, grid: SweepGrid) -> Self {
        Self {
            name: name.into(),
            units: None,
            grid,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Full name, possibly group-qualified (`"group/var"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without any group prefix.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    /// The sample grid, azimuth-major.
    pub fn read(&self) -> &SweepGrid {
        &self.grid
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SweepDocument {
    origin: SensorOrigin,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    data_variables: Option<Vec<String>>,
    #[serde(default)]
    axes: Vec<CoordinateAxis>,
    #[serde(default)]
    variables: Vec<VariableDocument>,
}

#[derive(Debug, Deserialize)]
struct VariableDocument {
    name: String,
    #[serde(default)]
    units: Option<String>,
    values: Vec<Vec<Option<f32>>>,
}

impl VariableDocument {
    fn into_variable(self) -> SweepReadResult<DataVariable> {
        let rows: Vec<Vec<f32>> = self
            .values
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
            .collect();
        if let Some(first) = rows.first() {
            if let Some(bad) = rows.iter().find(|r| r.len() != first.len()) {
                return Err(RadarError::ShapeMismatch {
                    azimuths: rows.len(),
                    distances: first.len(),
                    values: bad.len(),
                }
                .into());
            }
        }
        let grid = SweepGrid::from_rows(&rows)?;
        Ok(DataVariable {
            name: self.name,
            units: self.units,
            grid,
        })
    }
}

/// One loaded radial sweep.
#[derive(Debug, Clone)]
pub struct RadialSweep {
    origin: SensorOrigin,
    attributes: BTreeMap<String, f64>,
    declared: Vec<String>,
    axes: Vec<CoordinateAxis>,
    variables: Vec<DataVariable>,
}

impl RadialSweep {
    /// An empty sweep at `origin`: no axes, variables or attributes.
    pub fn new(origin: SensorOrigin) -> Self {
        Self {
            origin,
            attributes: BTreeMap::new(),
            declared: Vec::new(),
            axes: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Load and validate a sweep document from disk.
    pub fn open(
        path: impl AsRef<Path>,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> SweepReadResult<Self> {
        let path = path.as_ref();
        let result = std::fs::read_to_string(path)
            .map_err(SweepReadError::from)
            .and_then(|text| Self::from_json(&text));

        match &result {
            Ok(sweep) => {
                info!(
                    path = %path.display(),
                    variables = sweep.variables.len(),
                    axes = sweep.axes.len(),
                    "Opened sweep"
                );
                diag!(diagnostics, "opened {}", path.display());
            }
            Err(e) => {
                diag!(diagnostics, "failed to open {}: {}", path.display(), e);
            }
        }
        result
    }

    /// Parse and validate a sweep document.
    pub fn from_json(text: &str) -> SweepReadResult<Self> {
        let doc: SweepDocument = serde_json::from_str(text)?;

        let mut attributes = BTreeMap::new();
        for (name, value) in doc.attributes {
            match value.as_f64() {
                Some(v) => {
                    attributes.insert(name, v);
                }
                None => debug!(attribute = %name, "Skipping non-numeric attribute"),
            }
        }

        let variables = doc
            .variables
            .into_iter()
            .map(VariableDocument::into_variable)
            .collect::<SweepReadResult<Vec<_>>>()?;

        let declared = doc
            .data_variables
            .unwrap_or_else(|| variables.iter().map(|v| v.name.clone()).collect());

        let sweep = Self {
            origin: doc.origin,
            attributes,
            declared,
            axes: doc.axes,
            variables,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn with_axis(mut self, axis: CoordinateAxis) -> Self {
        self.axes.retain(|a| a.kind != axis.kind);
        self.axes.push(axis);
        self
    }

    /// Add a variable and declare it as a data variable.
    pub fn with_variable(mut self, variable: DataVariable) -> Self {
        if !self.declared.iter().any(|n| n == &variable.name) {
            self.declared.push(variable.name.clone());
        }
        self.variables.retain(|v| v.name != variable.name);
        self.variables.push(variable);
        self
    }

    /// Declare a data variable name without providing data for it.
    pub fn with_declared_variable(mut self, name: impl Into<String>) -> Self {
        self.declared.push(name.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Check every axis and that each variable matches the axis lengths.
    pub fn validate(&self) -> SweepReadResult<()> {
        for axis in &self.axes {
            axis.validate()?;
        }

        let azimuths = self.find_axis(AxisKind::RadialAzimuth).map(CoordinateAxis::len);
        let distances = self.find_axis(AxisKind::RadialDistance).map(CoordinateAxis::len);

        for variable in &self.variables {
            let grid = &variable.grid;
            let az_ok = azimuths.map_or(true, |n| n == grid.azimuth_count());
            let dist_ok = distances.map_or(true, |n| n == grid.distance_count());
            if !az_ok || !dist_ok {
                return Err(RadarError::ShapeMismatch {
                    azimuths: azimuths.unwrap_or(grid.azimuth_count()),
                    distances: distances.unwrap_or(grid.distance_count()),
                    values: grid.values().len(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn variables(&self) -> &[DataVariable] {
        &self.variables
    }
}

impl SweepDataset for RadialSweep {
    fn data_variable_names(&self) -> Vec<String> {
        self.declared.clone()
    }

    fn find_variable(&self, name: &str) -> Option<&DataVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    fn find_axis(&self, kind: AxisKind) -> Option<&CoordinateAxis> {
        self.axes.iter().find(|a| a.kind == kind)
    }

    fn common_origin(&self) -> SensorOrigin {
        self.origin
    }

    fn global_attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_group() {
        let grid = SweepGrid::new(0, 0, Vec::new()).unwrap();
        let var = DataVariable::new("sweep_1/Reflectivity", grid);
        assert_eq!(var.short_name(), "Reflectivity");
        assert_eq!(var.name(), "sweep_1/Reflectivity");
    }

    #[test]
    fn test_text_attribute_parsed_when_numeric() {
        assert_eq!(AttributeValue::Text(" 12.5 ".into()).as_f64(), Some(12.5));
        assert_eq!(AttributeValue::Text("KTLX".into()).as_f64(), None);
    }

    #[test]
    fn test_with_axis_replaces_same_kind() {
        let a = CoordinateAxis::from_pairs("a", AxisKind::RadialAzimuth, &[[0.0, 1.0]]).unwrap();
        let b = CoordinateAxis::from_pairs("b", AxisKind::RadialAzimuth, &[[1.0, 2.0]]).unwrap();
        let sweep = RadialSweep::new(SensorOrigin::new(0.0, 0.0))
            .with_axis(a)
            .with_axis(b);
        assert_eq!(sweep.find_axis(AxisKind::RadialAzimuth).unwrap().name, "b");
        assert!(sweep.find_axis(AxisKind::RadialDistance).is_none());
    }
}
