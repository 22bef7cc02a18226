//! Sensor-centered polar raster.
//!
//! No geodetic projection: a cell's corners sit at `d * scale * sin(az)`,
//! `d * scale * cos(az)` from the canvas center, north up. The scale fits the
//! outermost distance bound to half the canvas width.

use radar_common::{diag, AxisKind, Color, CoordinateAxis, DiagnosticSink, RadarError};
use serde::{Deserialize, Serialize};
use sweep_reader::{data_range, find_data_variable, require_axis, SweepDataset};
use tiny_skia::{FillRule, PathBuilder, Stroke, Transform};
use tracing::debug;

use crate::bands::ColorBands;
use crate::canvas::{solid_paint, Canvas};
use crate::error::{RenderError, RenderResult};
use crate::style::PolarStyle;

/// Options of the polar pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarOptions {
    /// Width and height of the square canvas.
    pub size: u32,
}

impl Default for PolarOptions {
    fn default() -> Self {
        Self { size: 2500 }
    }
}

/// One filled sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintedSector {
    pub azimuth_index: usize,
    pub distance_index: usize,
    pub value: f32,
    pub band: usize,
    pub color: Color,
}

/// Output of [`PolarPainter::paint`].
#[derive(Debug, Clone)]
pub struct PolarRender {
    pub canvas: Canvas,
    /// Sectors in paint order.
    pub sectors: Vec<PaintedSector>,
    /// Pixels per meter.
    pub scale: f64,
}

/// Pixels per meter that fit `distance_axis` into half of `size`.
pub fn polar_scale(size: u32, distance_axis: &CoordinateAxis) -> RenderResult<f64> {
    match distance_axis.max_bound() {
        Some(max) if max > 0.0 => Ok(size as f64 / max / 2.0),
        Some(max) => Err(RenderError::InvalidAxis {
            kind: AxisKind::RadialDistance,
            reason: format!("outermost bound {} is not positive", max),
        }),
        None => Err(RenderError::InvalidAxis {
            kind: AxisKind::RadialDistance,
            reason: "no finite bounds".to_string(),
        }),
    }
}

/// Canvas-local corners of a sector, y pointing north:
/// `(az_from, d_from)`, `(az_from, d_to)`, `(az_to, d_to)`, `(az_to, d_from)`.
pub fn sector_corners(
    azimuth: (f64, f64),
    distance: (f64, f64),
    scale: f64,
) -> [(f64, f64); 4] {
    let (sin_from, cos_from) = azimuth.0.to_radians().sin_cos();
    let (sin_to, cos_to) = azimuth.1.to_radians().sin_cos();
    let near = distance.0 * scale;
    let far = distance.1 * scale;
    [
        (near * sin_from, near * cos_from),
        (far * sin_from, far * cos_from),
        (far * sin_to, far * cos_to),
        (near * sin_to, near * cos_to),
    ]
}

/// Paints sweeps as quantized polar rasters.
#[derive(Debug, Clone)]
pub struct PolarPainter {
    style: PolarStyle,
    options: PolarOptions,
}

impl PolarPainter {
    pub fn new(style: PolarStyle, options: PolarOptions) -> Self {
        Self { style, options }
    }

    /// Draw the boundary circle, then every non-missing cell row-major.
    ///
    /// Missing axes or `data_min`/`data_max` are errors. A missing data
    /// variable leaves the canvas with just the background and outline.
    pub fn paint(
        &self,
        dataset: &dyn SweepDataset,
        diagnostics: &mut dyn DiagnosticSink,
    ) -> RenderResult<PolarRender> {
        let size = self.options.size;
        let azimuth_axis = require_axis(dataset, AxisKind::RadialAzimuth)?;
        let distance_axis = require_axis(dataset, AxisKind::RadialDistance)?;
        let scale = polar_scale(size, distance_axis)?;
        let (data_min, data_max) = data_range(dataset)?;
        let bands = ColorBands::from_palette(data_min, data_max, &self.style.palette)?;

        let mut canvas = Canvas::new(size, size, self.style.background)?;
        self.draw_outline(&mut canvas);

        let Some(variable) = find_data_variable(dataset) else {
            diag!(diagnostics, "no data variable; polar canvas holds the outline only");
            return Ok(PolarRender {
                canvas,
                sectors: Vec::new(),
                scale,
            });
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

        let center = (size / 2) as f32;
        let to_canvas = Transform::from_row(1.0, 0.0, 0.0, -1.0, center, center);
        let mut sectors = Vec::new();
        let pixmap = canvas.pixmap_mut();

        for (az, d, value) in grid.cells() {
            let corners = sector_corners(azimuth_axis.bounds(az), distance_axis.bounds(d), scale);
            let (band, color) = bands.classify(value as f64);

            let mut pb = PathBuilder::new();
            pb.move_to(corners[0].0 as f32, corners[0].1 as f32);
            for &(x, y) in &corners[1..] {
                pb.line_to(x as f32, y as f32);
            }
            pb.close();
            let Some(path) = pb.finish() else {
                continue;
            };

            let paint = solid_paint(color, self.style.anti_alias);
            pixmap.fill_path(&path, &paint, FillRule::Winding, to_canvas, None);
            sectors.push(PaintedSector {
                azimuth_index: az,
                distance_index: d,
                value,
                band,
                color,
            });
        }

        diag!(diagnostics, "painted {} sectors at {:.6} px/m", sectors.len(), scale);
        debug!(
            sectors = sectors.len(),
            missing = grid.missing_count(),
            size,
            scale,
            "Painted polar raster"
        );
        Ok(PolarRender {
            canvas,
            sectors,
            scale,
        })
    }

    fn draw_outline(&self, canvas: &mut Canvas) {
        let width = self.style.outline_width;
        if width <= 0.0 {
            return;
        }
        let half = canvas.width() as f32 / 2.0;
        let radius = half - width / 2.0;
        let Some(circle) = PathBuilder::from_circle(half, half, radius) else {
            return;
        };
        let paint = solid_paint(self.style.outline, self.style.anti_alias);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        canvas
            .pixmap_mut()
            .stroke_path(&circle, &paint, &stroke, Transform::identity(), None);
    }
}

/// Run the polar pipeline on a sweep.
pub fn render_polar(
    dataset: &dyn SweepDataset,
    options: &PolarOptions,
    style: &PolarStyle,
    diagnostics: &mut dyn DiagnosticSink,
) -> RenderResult<PolarRender> {
    PolarPainter::new(style.clone(), *options).paint(dataset, diagnostics)
}
