//! Drives one sweep through the requested pipelines and writes the outputs.

use anyhow::{Context, Result};
use clap::ValueEnum;
use radar_common::{BoundingBox, DiagnosticSink};
use renderer::{
    encode_to_file, render_polar, render_vector, ImageFormat, PngEncoder, StyleConfig,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use sweep_reader::{
    RadialSweep, GEOSPATIAL_LAT_MAX, GEOSPATIAL_LAT_MIN, GEOSPATIAL_LON_MAX, GEOSPATIAL_LON_MIN,
};
use tracing::{debug, info};

use crate::config::RenderConfig;

/// Which outputs to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Vector,
    Polar,
    #[default]
    Both,
}

impl RenderMode {
    pub fn vector(&self) -> bool {
        matches!(self, Self::Vector | Self::Both)
    }

    pub fn polar(&self) -> bool {
        matches!(self, Self::Polar | Self::Both)
    }
}

/// Input and destinations of one run.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub input: PathBuf,
    pub mode: RenderMode,
    pub vector_out: PathBuf,
    pub polar_out: PathBuf,
    /// Also write the vector features as GeoJSON.
    pub geojson_out: Option<PathBuf>,
    /// Replaces the sweep's `geospatial_*` attributes.
    pub envelope: Option<BoundingBox>,
}

impl RenderJob {
    /// Outputs next to `input`: `<stem>_vector.png`, `<stem>_polar.png`.
    pub fn beside_input(input: impl Into<PathBuf>, mode: RenderMode) -> Self {
        let input = input.into();
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sweep")
            .to_string();
        let dir = input.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            vector_out: dir.join(format!("{}_vector.png", stem)),
            polar_out: dir.join(format!("{}_polar.png", stem)),
            input,
            mode,
            geojson_out: None,
            envelope: None,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderSummary {
    /// Number of vector features, when the vector pipeline ran.
    pub features: Option<usize>,
    /// Number of painted sectors, when the polar pipeline ran.
    pub sectors: Option<usize>,
    pub written: Vec<PathBuf>,
}

/// Open the sweep and run the pipelines selected by `job.mode`.
pub fn run(
    job: &RenderJob,
    config: &RenderConfig,
    style: &StyleConfig,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<RenderSummary> {
    let mut sweep = RadialSweep::open(&job.input, diagnostics)
        .with_context(|| format!("failed to open sweep {}", job.input.display()))?;
    if let Some(envelope) = job.envelope {
        envelope.validate()?;
        sweep = sweep
            .with_attribute(GEOSPATIAL_LON_MIN, envelope.min_x)
            .with_attribute(GEOSPATIAL_LAT_MIN, envelope.min_y)
            .with_attribute(GEOSPATIAL_LON_MAX, envelope.max_x)
            .with_attribute(GEOSPATIAL_LAT_MAX, envelope.max_y);
        debug!(envelope = %envelope, "Envelope overridden");
    }
    let encoder = PngEncoder::new().with_level(config.compression_level);
    let mut summary = RenderSummary::default();

    if job.mode.vector() {
        let render = render_vector(&sweep, &config.vector, &style.scene, diagnostics)
            .context("vector rendering failed")?;
        write_image(&encoder, &render.canvas, &job.vector_out)?;
        summary.written.push(job.vector_out.clone());

        if let Some(path) = &job.geojson_out {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, &render.features.to_geojson())
                .with_context(|| format!("failed to write {}", path.display()))?;
            out.flush()?;
            summary.written.push(path.clone());
        }
        summary.features = Some(render.features.len());
    }

    if job.mode.polar() {
        let render = render_polar(&sweep, &config.polar, &style.polar, diagnostics)
            .context("polar rendering failed")?;
        write_image(&encoder, &render.canvas, &job.polar_out)?;
        summary.written.push(job.polar_out.clone());
        summary.sectors = Some(render.sectors.len());
    }

    info!(
        input = %job.input.display(),
        features = ?summary.features,
        sectors = ?summary.sectors,
        outputs = summary.written.len(),
        "Render complete"
    );
    Ok(summary)
}

fn write_image(encoder: &PngEncoder, canvas: &renderer::Canvas, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or_default();
    encode_to_file(encoder, canvas, format, path)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert!(RenderMode::Both.vector() && RenderMode::Both.polar());
        assert!(RenderMode::Vector.vector() && !RenderMode::Vector.polar());
        assert!(!RenderMode::Polar.vector() && RenderMode::Polar.polar());
    }

    #[test]
    fn test_outputs_beside_input() {
        let job = RenderJob::beside_input("/data/ktlx.json", RenderMode::Both);
        assert_eq!(job.vector_out, PathBuf::from("/data/ktlx_vector.png"));
        assert_eq!(job.polar_out, PathBuf::from("/data/ktlx_polar.png"));
        assert!(job.geojson_out.is_none());
        assert!(job.envelope.is_none());
    }
}
