//! Value-to-color quantization for the polar raster.

use radar_common::Color;

use crate::error::{RenderError, RenderResult};
use crate::style::BandPalette;

/// Band of `value` among `count` equal-width buckets spanning `[min, max]`.
///
/// `min` maps to band 0 and `max` to `count - 1`; values outside the range
/// clamp to the end bands. A zero-width range puts everything in band 0.
///
/// ```
/// use renderer::bands::band_index;
///
/// assert_eq!(band_index(5.0, 0.0, 10.0, 10), 5);
/// assert_eq!(band_index(10.0, 0.0, 10.0, 10), 9);
/// assert_eq!(band_index(-3.0, 0.0, 10.0, 10), 0);
/// ```
pub fn band_index(value: f64, min: f64, max: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let range = max - min;
    if range == 0.0 || !range.is_finite() {
        return 0;
    }
    let position = (count as f64 * (value - min) / range).floor();
    if position.is_nan() || position < 0.0 {
        0
    } else {
        (position as usize).min(count - 1)
    }
}

/// A resolved palette over a declared data range.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBands {
    min: f64,
    max: f64,
    colors: Vec<Color>,
}

impl ColorBands {
    pub fn new(min: f64, max: f64, colors: Vec<Color>) -> RenderResult<Self> {
        if colors.is_empty() {
            return Err(RenderError::invalid_style("palette has no bands"));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(RenderError::invalid_style(format!(
                "data range {}..{} is not finite",
                min, max
            )));
        }
        Ok(Self { min, max, colors })
    }

    pub fn from_palette(min: f64, max: f64, palette: &BandPalette) -> RenderResult<Self> {
        palette.validate()?;
        Self::new(min, max, palette.colors())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn index(&self, value: f64) -> usize {
        band_index(value, self.min, self.max, self.colors.len())
    }

    /// Band index and color of `value`.
    pub fn classify(&self, value: f64) -> (usize, Color) {
        let band = self.index(value);
        (band, self.colors[band])
    }
}
