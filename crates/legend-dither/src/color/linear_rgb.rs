//! Linear-light RGB, where channel arithmetic is physically meaningful.

use super::lut::srgb_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB.
///
/// Values are proportional to emitted light, so offsets and error terms
/// are added here. Intermediate values may leave `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    /// Red channel (linear light)
    pub r: f32,
    /// Green channel (linear light)
    pub g: f32,
    /// Blue channel (linear light)
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Add the same offset to every channel.
    #[inline]
    pub fn offset(self, amount: f32) -> Self {
        Self::new(self.r + amount, self.g + amount, self.b + amount)
    }

    /// True when every channel lies within `-tolerance..=1.0 + tolerance`.
    #[inline]
    pub fn in_unit_cube(self, tolerance: f32) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|&c| c >= -tolerance && c <= 1.0 + tolerance)
    }

    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb_to_linear(srgb.r),
            g: srgb_to_linear(srgb.g),
            b: srgb_to_linear(srgb.b),
        }
    }
}
