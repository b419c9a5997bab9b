//! Gamma-encoded sRGB, the color space of every input and output pixel.

use std::fmt;
use std::str::FromStr;

use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb;
use crate::palette::ParseColorError;

/// A color in gamma-encoded sRGB.
///
/// Channels are stored as floats in `0.0..=1.0` (`0..=255` for 8-bit data).
/// This is the type pixels arrive in from the decoder and the type palette
/// entries are stored in; all arithmetic happens in [`LinearRgb`] or
/// [`Oklab`](super::Oklab) instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    /// Red channel (0.0..=1.0)
    pub r: f32,
    /// Green channel (0.0..=1.0)
    pub g: f32,
    /// Blue channel (0.0..=1.0)
    pub b: f32,
}

impl Srgb {
    /// Pure black.
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Pure white.
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit channels.
    ///
    /// ```
    /// use legend_dither::Srgb;
    /// let red = Srgb::from_u8(255, 0, 0);
    /// assert_eq!(red.r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Round and clamp to 8-bit channels.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Lowercase `#rrggbb` form of the 8-bit color.
    ///
    /// ```
    /// use legend_dither::Srgb;
    /// assert_eq!(Srgb::from_u8(255, 128, 0).to_hex(), "#ff8000");
    /// ```
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// True when every channel is a finite number.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.to_bytes();
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<LinearRgb> for Srgb {
    /// Gamma-encode through the lookup table. Out-of-range channels clamp.
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb(linear.r),
            g: linear_to_srgb(linear.g),
            b: linear_to_srgb(linear.b),
        }
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive,
    /// surrounding whitespace ignored).
    ///
    /// ```
    /// use legend_dither::Srgb;
    /// let red: Srgb = "#FF0000".parse().unwrap();
    /// assert_eq!(red.to_bytes(), [255, 0, 0]);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&s[i..i + 1], 16).map(|v| v * 17);
                Ok(Self::from_u8(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&s[i..i + 2], 16);
                Ok(Self::from_u8(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
