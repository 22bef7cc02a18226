//! Vector scene: sweep features composited over a geographic envelope.

use radar_common::{diag, BoundingBox, DiagnosticSink, GeoPoint};
use serde::{Deserialize, Serialize};
use sweep_reader::{geospatial_envelope, SweepDataset};
use tiny_skia::{FillRule, PathBuilder, Stroke, Transform};
use tracing::debug;

use crate::canvas::{solid_paint, Canvas};
use crate::error::RenderResult;
use crate::feature::{FeatureCollection, Polygon};
use crate::polygon::{build_features, DistanceSelector};
use crate::style::SceneStyle;

/// Options of the vector pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorOptions {
    pub width: u32,
    pub height: u32,
    pub distance: DistanceSelector,
}

impl Default for VectorOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            distance: DistanceSelector::Middle,
        }
    }
}

/// Affine map from an envelope to canvas pixels.
///
/// x grows with longitude, y grows southward; the envelope corners land on
/// the canvas corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    envelope: BoundingBox,
    scale_x: f64,
    scale_y: f64,
}

impl GeoTransform {
    pub fn new(envelope: BoundingBox, width: u32, height: u32) -> RenderResult<Self> {
        envelope.validate()?;
        Ok(Self {
            envelope,
            scale_x: width as f64 / envelope.width(),
            scale_y: height as f64 / envelope.height(),
        })
    }

    pub fn envelope(&self) -> BoundingBox {
        self.envelope
    }

    pub fn to_pixel(&self, point: GeoPoint) -> (f64, f64) {
        (
            (point.lon - self.envelope.min_x) * self.scale_x,
            (self.envelope.max_y - point.lat) * self.scale_y,
        )
    }
}

/// Paints a feature collection with one fixed style.
#[derive(Debug, Clone)]
pub struct SceneComposer {
    style: SceneStyle,
    width: u32,
    height: u32,
}

impl SceneComposer {
    pub fn new(style: SceneStyle, width: u32, height: u32) -> Self {
        Self {
            style,
            width,
            height,
        }
    }

    pub fn with_options(style: SceneStyle, options: &VectorOptions) -> Self {
        Self::new(style, options.width, options.height)
    }

    /// Fill the background, then fill and stroke every feature in order.
    pub fn compose(
        &self,
        features: &FeatureCollection,
        envelope: BoundingBox,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> RenderResult<Canvas> {
        let transform = GeoTransform::new(envelope, self.width, self.height)?;
        let mut canvas = Canvas::new(self.width, self.height, self.style.background)?;
        diag!(diagnostics, "map area: {}", envelope);

        let fill = solid_paint(self.style.fill, self.style.anti_alias);
        let stroke_paint = solid_paint(self.style.stroke, self.style.anti_alias);
        let stroke = Stroke {
            width: self.style.stroke_width,
            ..Stroke::default()
        };

        let pixmap = canvas.pixmap_mut();
        let mut painted = 0usize;
        for feature in features {
            let Some(path) = polygon_path(&feature.polygon, &transform) else {
                continue;
            };
            pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
            if self.style.stroke_width > 0.0 {
                pixmap.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);
            }
            painted += 1;
        }

        debug!(
            features = features.len(),
            painted,
            width = self.width,
            height = self.height,
            "Composed vector scene"
        );
        Ok(canvas)
    }
}

fn polygon_path(polygon: &Polygon, transform: &GeoTransform) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for (i, point) in polygon.corners().iter().enumerate() {
        let (x, y) = transform.to_pixel(*point);
        if i == 0 {
            pb.move_to(x as f32, y as f32);
        } else {
            pb.line_to(x as f32, y as f32);
        }
    }
    pb.close();
    pb.finish()
}

/// Output of [`render_vector`].
#[derive(Debug, Clone)]
pub struct VectorRender {
    pub features: FeatureCollection,
    pub envelope: BoundingBox,
    pub canvas: Canvas,
}

/// Run the vector pipeline on a sweep.
///
/// Missing axes or data variable give an empty scene (background only); a
/// missing `geospatial_*` attribute is an error.
pub fn render_vector(
    dataset: &dyn SweepDataset,
    options: &VectorOptions,
    style: &SceneStyle,
    diagnostics: &mut dyn DiagnosticSink,
) -> RenderResult<VectorRender> {
    let features = build_features(dataset, options.distance, diagnostics)?;
    let envelope = geospatial_envelope(dataset)?;
    let canvas =
        SceneComposer::with_options(style.clone(), options).compose(&features, envelope, diagnostics)?;
    Ok(VectorRender {
        features,
        envelope,
        canvas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_maps_envelope_corners() {
        let env = BoundingBox::new(-100.0, 40.0, -99.0, 41.0);
        let t = GeoTransform::new(env, 500, 500).unwrap();
        assert_eq!(t.to_pixel(GeoPoint::new(-100.0, 41.0)), (0.0, 0.0));
        assert_eq!(t.to_pixel(GeoPoint::new(-99.0, 40.0)), (500.0, 500.0));
        assert_eq!(t.to_pixel(GeoPoint::new(-99.5, 40.5)), (250.0, 250.0));
    }

    #[test]
    fn test_degenerate_envelope_rejected() {
        let env = BoundingBox::new(-100.0, 40.0, -100.0, 41.0);
        assert!(GeoTransform::new(env, 500, 500).is_err());
    }

    #[test]
    fn test_default_options() {
        let options = VectorOptions::default();
        assert_eq!((options.width, options.height), (500, 500));
        assert_eq!(options.distance, DistanceSelector::Middle);
    }
}
