//! Render configuration.
//!
//! Loaded from a YAML file when one is given, otherwise defaults; then
//! environment overrides are applied on top.

use anyhow::{bail, Context, Result};
use renderer::{BandPalette, DistanceSelector, PolarOptions, StyleConfig, VectorOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ENV_VECTOR_SIZE: &str = "SWEEP_VECTOR_SIZE";
pub const ENV_POLAR_SIZE: &str = "SWEEP_POLAR_SIZE";
pub const ENV_DISTANCE_SELECTOR: &str = "SWEEP_DISTANCE_SELECTOR";
pub const ENV_BANDS: &str = "SWEEP_BANDS";

/// Top-level configuration of the `sweep-render` CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Vector scene size and distance selection
    pub vector: VectorOptions,

    /// Polar canvas size
    pub polar: PolarOptions,

    /// Replaces the style's polar palette with this many generated bands
    pub bands: Option<usize>,

    /// zlib level of the PNG encoder, 0-9
    pub compression_level: u32,

    /// Style JSON file
    pub style_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vector: VectorOptions::default(),
            polar: PolarOptions::default(),
            bands: None,
            compression_level: 1,
            style_path: None,
        }
    }
}

impl RenderConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).context("invalid render config")?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::from_yaml(&content)?;

        // Relative style paths are resolved against the config file.
        if let (Some(style), Some(dir)) = (&config.style_path, path.parent()) {
            if style.is_relative() {
                config.style_path = Some(dir.join(style));
            }
        }
        Ok(config)
    }

    /// File if given, else defaults; then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SWEEP_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_VECTOR_SIZE) {
            let size = parse_number::<u32>(ENV_VECTOR_SIZE, &v)?;
            self.vector.width = size;
            self.vector.height = size;
            debug!(size, "Vector size from environment");
        }
        if let Some(v) = lookup(ENV_POLAR_SIZE) {
            self.polar.size = parse_number(ENV_POLAR_SIZE, &v)?;
            debug!(size = self.polar.size, "Polar size from environment");
        }
        if let Some(v) = lookup(ENV_DISTANCE_SELECTOR) {
            self.vector.distance = v
                .parse::<DistanceSelector>()
                .map_err(|e| anyhow::anyhow!("{}: {}", ENV_DISTANCE_SELECTOR, e))?;
        }
        if let Some(v) = lookup(ENV_BANDS) {
            self.bands = Some(parse_number(ENV_BANDS, &v)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.vector.width == 0 || self.vector.height == 0 {
            bail!(
                "vector canvas must not be empty, got {}x{}",
                self.vector.width,
                self.vector.height
            );
        }
        if self.polar.size == 0 {
            bail!("polar canvas size must be positive");
        }
        if self.bands == Some(0) {
            bail!("bands must be positive");
        }
        if self.compression_level > 9 {
            warn!(level = self.compression_level, "Compression level above 9, clamping");
        }
        Ok(())
    }

    /// Style from `style_path` (or defaults), with the band override applied.
    pub fn resolve_style(&self) -> Result<StyleConfig> {
        let mut style = match &self.style_path {
            Some(path) => StyleConfig::from_file(path)
                .with_context(|| format!("failed to load style {}", path.display()))?,
            None => StyleConfig::default(),
        };
        if let Some(bands) = self.bands {
            style.polar.palette = BandPalette::generated(bands);
        }
        Ok(style)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{}: '{}' is not a valid number", key, value))
}
