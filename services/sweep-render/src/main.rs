//! Radar sweep renderer.
//!
//! Reads a sweep document and writes a geo-referenced vector image, a
//! sensor-centered polar raster, or both.

use anyhow::Result;
use clap::Parser;
use radar_common::{BoundingBox, TracingSink};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sweep_render::{run, RenderConfig, RenderJob, RenderMode};

#[derive(Parser, Debug)]
#[command(name = "sweep-render")]
#[command(about = "Render a radar sweep as vector polygons and a polar raster")]
struct Args {
    /// Sweep document (JSON)
    #[arg(env = "SWEEP_INPUT")]
    input: PathBuf,

    /// Which pipelines to run
    #[arg(short, long, value_enum, default_value_t = RenderMode::Both)]
    mode: RenderMode,

    /// Vector image path (default: <input>_vector.png)
    #[arg(long)]
    vector_out: Option<PathBuf>,

    /// Polar image path (default: <input>_polar.png)
    #[arg(long)]
    polar_out: Option<PathBuf>,

    /// Also write the vector features as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Vector envelope as "minx,miny,maxx,maxy", replacing the sweep's attributes
    #[arg(long, value_parser = BoundingBox::parse)]
    envelope: Option<BoundingBox>,

    /// Configuration file (YAML)
    #[arg(short, long, env = "SWEEP_CONFIG")]
    config: Option<PathBuf>,

    /// Style file (JSON), overrides the config's style_path
    #[arg(short, long, env = "SWEEP_STYLE")]
    style: Option<PathBuf>,

    /// Distance bins to draw in the vector scene: middle, all or an index
    #[arg(long)]
    distance: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level, args.json_logs)?;

    let mut config = RenderConfig::load(args.config.as_deref())?;
    if let Some(style) = &args.style {
        config.style_path = Some(style.clone());
    }
    if let Some(distance) = &args.distance {
        config.vector.distance = distance.parse().map_err(anyhow::Error::msg)?;
    }
    let style = config.resolve_style()?;

    let mut job = RenderJob::beside_input(&args.input, args.mode);
    if let Some(path) = args.vector_out {
        job.vector_out = path;
    }
    if let Some(path) = args.polar_out {
        job.polar_out = path;
    }
    job.geojson_out = args.geojson;
    job.envelope = args.envelope;

    info!(
        input = %job.input.display(),
        mode = ?job.mode,
        distance = %config.vector.distance,
        "Starting sweep render"
    );

    let summary = run(&job, &config, &style, &mut TracingSink)?;
    for path in &summary.written {
        println!("{}", path.display());
    }
    Ok(())
}

/// `RUST_LOG` wins over `--log-level` when set.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
