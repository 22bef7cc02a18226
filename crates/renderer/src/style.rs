//! Declarative styles for both pipelines.
//!
//! Styles are plain data loaded from JSON; every field has a default so a
//! style file only needs to name what it changes.

use std::path::Path;

use radar_common::Color;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Fixed fill/stroke style of the vector scene.
///
/// Sample values are not visually encoded: every polygon gets the same
/// paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub background: Color,
    pub fill: Color,
    pub stroke: Color,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    pub anti_alias: bool,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            background: Color::BLUE,
            fill: Color::GRAY,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            anti_alias: false,
        }
    }
}

/// Colors of the quantized polar raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BandPalette {
    /// `count` hues evenly spaced over `hue_span` of the color wheel.
    Generated {
        count: usize,
        #[serde(default = "default_hue_span")]
        hue_span: f32,
        #[serde(default = "default_saturation")]
        saturation: f32,
        #[serde(default = "default_brightness")]
        brightness: f32,
    },
    /// Explicit colors, lowest band first.
    Explicit { colors: Vec<Color> },
}

fn default_hue_span() -> f32 {
    0.9
}

fn default_saturation() -> f32 {
    0.5
}

fn default_brightness() -> f32 {
    1.0
}

impl BandPalette {
    pub const DEFAULT_BANDS: usize = 10;

    /// Generated palette with the default hue span, saturation and brightness.
    pub fn generated(count: usize) -> Self {
        Self::Generated {
            count,
            hue_span: default_hue_span(),
            saturation: default_saturation(),
            brightness: default_brightness(),
        }
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        match self {
            Self::Generated { count, .. } => *count,
            Self::Explicit { colors } => colors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the band colors, lowest band first.
    pub fn colors(&self) -> Vec<Color> {
        match self {
            Self::Generated {
                count,
                hue_span,
                saturation,
                brightness,
            } => (0..*count)
                .map(|i| {
                    let hue = hue_span * i as f32 / *count as f32;
                    Color::from_hsb(hue, *saturation, *brightness)
                })
                .collect(),
            Self::Explicit { colors } => colors.clone(),
        }
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.is_empty() {
            return Err(RenderError::invalid_style("palette has no bands"));
        }
        if let Self::Generated {
            hue_span,
            saturation,
            brightness,
            ..
        } = self
        {
            let finite = [hue_span, saturation, brightness].iter().all(|v| v.is_finite());
            if !finite {
                return Err(RenderError::invalid_style("palette parameters must be finite"));
            }
        }
        Ok(())
    }
}

impl Default for BandPalette {
    fn default() -> Self {
        Self::generated(Self::DEFAULT_BANDS)
    }
}

/// Style of the sensor-centered polar raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarStyle {
    pub background: Color,
    /// Circular boundary drawn before any sector.
    pub outline: Color,
    pub outline_width: f32,
    pub palette: BandPalette,
    pub anti_alias: bool,
}

impl Default for PolarStyle {
    fn default() -> Self {
        Self {
            background: Color::TRANSPARENT,
            outline: Color::GREEN,
            outline_width: 1.0,
            palette: BandPalette::default(),
            anti_alias: false,
        }
    }
}

/// Both styles, as loaded from a style file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub scene: SceneStyle,
    pub polar: PolarStyle,
}

impl StyleConfig {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json_str)
            .map_err(|e| RenderError::invalid_style(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load style configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if !self.scene.stroke_width.is_finite() || self.scene.stroke_width < 0.0 {
            return Err(RenderError::invalid_style("stroke_width must be >= 0"));
        }
        if !self.polar.outline_width.is_finite() || self.polar.outline_width < 0.0 {
            return Err(RenderError::invalid_style("outline_width must be >= 0"));
        }
        self.polar.palette.validate()
    }
}
