//! Hex color parsing and CSS `rgba()` formatting for chart styles.

use std::fmt;

use crate::error::ColorError;

/// Fallback used when a color string can't be parsed.
const FALLBACK_RGB: &str = "0,0,0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.len() != 6 {
            return Err(ColorError::Length(digits.len()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::Digit(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::Digit(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// CSS `rgba(r, g, b, a)` string
    pub fn to_rgba(self, opacity: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, opacity)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Convert `#RRGGBB` to a CSS `rgba()` string at the given opacity.
///
/// Anything that isn't six hex digits comes out as black at that opacity.
pub fn hex_to_rgba(hex: &str, opacity: f64) -> String {
    match Rgb::from_hex(hex) {
        Ok(rgb) => rgb.to_rgba(opacity),
        Err(e) => {
            tracing::debug!("Falling back to black for {:?}: {}", hex, e);
            format!("rgba({},{})", FALLBACK_RGB, opacity)
        }
    }
}
