//! Image encoders for finished canvases.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::canvas::Canvas;
use crate::error::{RenderError, RenderResult};
use crate::png;

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            other => Err(RenderError::encoding(format!("unsupported image format '{}'", other))),
        }
    }
}

/// Turns a canvas into encoded bytes on a stream.
pub trait ImageEncoder {
    fn encode(&self, canvas: &Canvas, format: ImageFormat, out: &mut dyn Write) -> RenderResult<()>;
}

/// PNG encoder with indexed/RGBA auto-selection.
#[derive(Debug, Clone, Copy)]
pub struct PngEncoder {
    compression: Compression,
    force_rgba: bool,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self {
            compression: Compression::fast(),
            force_rgba: false,
        }
    }
}

impl PngEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// zlib level, 0-9.
    pub fn with_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }

    /// Always write truecolor with alpha.
    pub fn force_rgba(mut self, force: bool) -> Self {
        self.force_rgba = force;
        self
    }

    /// Encode to an in-memory buffer.
    pub fn to_bytes(&self, canvas: &Canvas) -> RenderResult<Vec<u8>> {
        let rgba = canvas.to_rgba();
        let (w, h) = (canvas.width() as usize, canvas.height() as usize);
        if self.force_rgba {
            png::encode_rgba(&rgba, w, h, self.compression)
        } else {
            png::encode_auto(&rgba, w, h, self.compression)
        }
    }
}

impl ImageEncoder for PngEncoder {
    fn encode(&self, canvas: &Canvas, format: ImageFormat, out: &mut dyn Write) -> RenderResult<()> {
        match format {
            ImageFormat::Png => {
                let bytes = self.to_bytes(canvas)?;
                out.write_all(&bytes)?;
                Ok(())
            }
        }
    }
}

/// Encode `canvas` into a new file at `path`.
pub fn encode_to_file(
    encoder: &dyn ImageEncoder,
    canvas: &Canvas,
    format: ImageFormat,
    path: &Path,
) -> RenderResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    encoder.encode(canvas, format, &mut out)?;
    out.flush()?;
    info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        format = %format,
        "Wrote image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("out/scene.PNG")), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_path(Path::new("scene.gif")), None);
        assert_eq!(ImageFormat::from_path(Path::new("scene")), None);
        assert!("jpeg".parse::<ImageFormat>().is_err());
    }
}
