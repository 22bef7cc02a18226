//! RGBA colors with hex and HSB constructors.

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, RadarResult};

/// Color value in RGBA format.
///
/// Serialized as a hex string (`#RRGGBB` or `#RRGGBBAA`) so styles can be
/// written by hand in JSON or YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    pub const GRAY: Color = Color::opaque(128, 128, 128);
    pub const BLUE: Color = Color::opaque(0, 0, 255);
    pub const GREEN: Color = Color::opaque(0, 255, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> RadarResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 && digits.len() != 8 {
            return Err(RadarError::invalid_color(hex));
        }

        let channel = |i: usize| {
            digits
                .get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| RadarError::invalid_color(hex))
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Opaque color from hue, saturation and brightness, each in `[0, 1]`.
    ///
    /// Only the fractional part of `hue` is used, so hues wrap around the
    /// color wheel.
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;

        if saturation <= 0.0 {
            let v = to_byte(brightness);
            return Self::opaque(v, v, v);
        }

        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));

        let (r, g, b) = match h as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };

        Self::opaque(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Hex representation; alpha is only emitted when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = RadarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000").unwrap(), Color::opaque(255, 0, 0));
        assert_eq!(Color::from_hex("00FF00").unwrap(), Color::opaque(0, 255, 0));
        assert_eq!(Color::from_hex("#0000FF80").unwrap(), Color::new(0, 0, 255, 128));
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#FFF").is_err());
    }

    #[test]
    fn test_hsb_primaries() {
        assert_eq!(Color::from_hsb(0.0, 1.0, 1.0), Color::opaque(255, 0, 0));
        assert_eq!(Color::from_hsb(1.0 / 3.0, 1.0, 1.0), Color::opaque(0, 255, 0));
        assert_eq!(Color::from_hsb(2.0 / 3.0, 1.0, 1.0), Color::opaque(0, 0, 255));
        assert_eq!(Color::from_hsb(0.5, 0.0, 1.0), Color::opaque(255, 255, 255));
    }

    #[test]
    fn test_hsb_wraps_hue() {
        assert_eq!(Color::from_hsb(1.25, 0.5, 1.0), Color::from_hsb(0.25, 0.5, 1.0));
    }

    #[test]
    fn test_serde_as_hex() {
        let json = serde_json::to_string(&Color::GRAY).unwrap();
        assert_eq!(json, "\"#808080\"");
        let back: Color = serde_json::from_str("\"#80808040\"").unwrap();
        assert_eq!(back, Color::new(128, 128, 128, 64));
    }
}
