//! Dithering configuration.

use super::DitherAlgorithm;

/// Configuration for [`dither`](super::dither).
///
/// # Defaults
///
/// - algorithm: Bayer ordered dithering
/// - matrix size: 16
/// - spread: 0.25
/// - seed: 0 (random-noise thresholds only)
/// - serpentine scanning and an error clamp of 0.5 (error diffusion only)
///
/// # Example
///
/// ```
/// use legend_dither::{DitherAlgorithm, DitherOptions};
///
/// let options = DitherOptions::new()
///     .algorithm(DitherAlgorithm::ClusteredDot)
///     .spread(0.64);
/// assert_eq!(options.matrix_size, 16);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitherOptions {
    pub algorithm: DitherAlgorithm,
    /// Side of the Bayer matrix; a power of two, at least 2.
    pub matrix_size: usize,
    /// Scale of the threshold offset in linear intensity.
    pub spread: f32,
    pub seed: u64,
    pub serpentine: bool,
    pub error_clamp: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            algorithm: DitherAlgorithm::default(),
            matrix_size: 16,
            spread: 0.25,
            seed: 0,
            serpentine: true,
            error_clamp: 0.5,
        }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn matrix_size(mut self, size: usize) -> Self {
        self.matrix_size = size;
        self
    }

    #[inline]
    pub fn spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp;
        self
    }
}
