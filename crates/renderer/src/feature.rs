//! Sweep cell features and their GeoJSON form.

use std::fmt;

use radar_common::{BoundingBox, GeoPoint};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed quadrilateral ring: four corners plus the first corner repeated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    ring: [GeoPoint; 5],
}

impl Polygon {
    /// Close the ring over four corners, in order.
    pub fn from_corners(corners: [GeoPoint; 4]) -> Self {
        Self {
            ring: [corners[0], corners[1], corners[2], corners[3], corners[0]],
        }
    }

    pub fn ring(&self) -> &[GeoPoint; 5] {
        &self.ring
    }

    /// The four distinct corners.
    pub fn corners(&self) -> &[GeoPoint] {
        &self.ring[..4]
    }

    pub fn envelope(&self) -> BoundingBox {
        let mut bbox = BoundingBox::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in self.corners() {
            bbox.min_x = bbox.min_x.min(p.lon);
            bbox.min_y = bbox.min_y.min(p.lat);
            bbox.max_x = bbox.max_x.max(p.lon);
            bbox.max_y = bbox.max_y.max(p.lat);
        }
        bbox
    }

    fn coordinates(&self) -> Vec<[f64; 2]> {
        self.ring.iter().map(|p| [p.lon, p.lat]).collect()
    }
}

/// Well-known text, e.g. `POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))`.
impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("POLYGON ((")?;
        for (i, p) in self.ring.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str("))")
    }
}

/// One rendered sweep cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub azimuth: String,
    pub distance: String,
    pub value: f32,
    pub polygon: Polygon,
}

/// Features of one sweep, in azimuth-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    /// Short name of the data variable.
    pub schema: String,
    pub azimuth_field: String,
    pub distance_field: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(
        schema: impl Into<String>,
        azimuth_field: impl Into<String>,
        distance_field: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            azimuth_field: azimuth_field.into(),
            distance_field: distance_field.into(),
            features: Vec::new(),
        }
    }

    /// Collection with no schema, used when the sweep has nothing to render.
    pub fn empty() -> Self {
        Self::new("", "azimuth", "distance")
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Envelope of every feature, or `None` when empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.features
            .iter()
            .map(|f| f.polygon.envelope())
            .reduce(|a, b| {
                BoundingBox::new(
                    a.min_x.min(b.min_x),
                    a.min_y.min(b.min_y),
                    a.max_x.max(b.max_x),
                    a.max_y.max(b.max_y),
                )
            })
    }

    /// Convert to a GeoJSON `FeatureCollection`.
    pub fn to_geojson(&self) -> GeoJsonFeatureCollection {
        let features = self
            .features
            .iter()
            .map(|f| {
                let mut properties = Map::new();
                properties.insert(self.azimuth_field.clone(), Value::from(f.azimuth.clone()));
                properties.insert(self.distance_field.clone(), Value::from(f.distance.clone()));
                properties.insert("value".to_string(), Value::from(f.value as f64));
                GeoJsonFeature {
                    type_: "Feature".to_string(),
                    geometry: GeoJsonGeometry::Polygon {
                        coordinates: vec![f.polygon.coordinates()],
                    },
                    properties,
                }
            })
            .collect();

        GeoJsonFeatureCollection {
            type_: "FeatureCollection".to_string(),
            name: (!self.schema.is_empty()).then(|| self.schema.clone()),
            features,
        }
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoJsonFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub features: Vec<GeoJsonFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoJsonFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: GeoJsonGeometry,

    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Polygon {
        /// Rings of `[longitude, latitude]` pairs; exterior ring first.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_corners([
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ])
    }

    #[test]
    fn test_ring_is_closed() {
        let polygon = square();
        assert_eq!(polygon.ring().len(), 5);
        assert_eq!(polygon.ring()[0], polygon.ring()[4]);
    }

    #[test]
    fn test_wkt() {
        assert_eq!(
            square().to_string(),
            "POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))"
        );
    }

    #[test]
    fn test_geojson_properties_use_axis_names() {
        let mut collection = FeatureCollection::new("Reflectivity", "azimuth", "distance");
        collection.features.push(Feature {
            azimuth: "5".into(),
            distance: "150".into(),
            value: 8.0,
            polygon: square(),
        });

        let json = serde_json::to_value(collection.to_geojson()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["name"], "Reflectivity");
        let feature = &json["features"][0];
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(feature["properties"]["azimuth"], "5");
        assert_eq!(feature["properties"]["distance"], "150");
        assert_eq!(feature["properties"]["value"], 8.0);
    }

    #[test]
    fn test_bounds() {
        let mut collection = FeatureCollection::empty();
        assert!(collection.bounds().is_none());
        collection.features.push(Feature {
            azimuth: "a".into(),
            distance: "d".into(),
            value: 1.0,
            polygon: square(),
        });
        let bounds = collection.bounds().unwrap();
        assert_eq!((bounds.min_x, bounds.max_y), (0.0, 1.0));
    }
}
