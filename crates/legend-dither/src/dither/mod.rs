//! Mapping pixels onto a palette.
//!
//! Every strategy implements [`Dither`]. Ordered strategies are one generic
//! [`OrderedDither`] parameterized by a [`ThresholdMap`] (the per-pixel
//! perturbation); error diffusion is [`ErrorDiffusion`] with a
//! [`Kernel`]. [`DitherAlgorithm`] picks one from configuration, and
//! [`dither`] runs it over a [`PixelGrid`].
//!
//! # Example
//!
//! ```
//! use legend_dither::{dither, DitherOptions, Palette, PixelGrid, Srgb};
//!
//! let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
//! let grid = PixelGrid::new(vec![Srgb::from_u8(128, 128, 128); 16], 4, 4).unwrap();
//! let raster = dither(&grid, &palette, &DitherOptions::default()).unwrap();
//! assert_eq!(raster.indices().len(), 16);
//! ```

mod diffusion;
mod kernel;
mod options;
mod ordered;
mod threshold;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use diffusion::ErrorDiffusion;
pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};
pub use options::DitherOptions;
pub use ordered::OrderedDither;
pub use threshold::{Bayer, ClusteredDot, RandomNoise, ThresholdMap, MAX_MATRIX_SIZE};

use crate::api::QuantizeError;
use crate::color::LinearRgb;
use crate::grid::PixelGrid;
use crate::output::PalettedRaster;
use crate::palette::Palette;

/// Which strategy [`dither`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherAlgorithm {
    /// Recursive Bayer matrix of `matrix_size`
    #[default]
    Bayer,
    /// 4×4 clustered-dot screen
    ClusteredDot,
    /// Hashed white noise, reproducible from `seed`
    RandomNoise,
    /// Floyd-Steinberg error diffusion
    FloydSteinberg,
    /// Atkinson error diffusion
    Atkinson,
}

impl DitherAlgorithm {
    pub const ALL: [DitherAlgorithm; 5] = [
        DitherAlgorithm::Bayer,
        DitherAlgorithm::ClusteredDot,
        DitherAlgorithm::RandomNoise,
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::Atkinson,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::Bayer => "bayer",
            DitherAlgorithm::ClusteredDot => "clustered-dot",
            DitherAlgorithm::RandomNoise => "random-noise",
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::Atkinson => "atkinson",
        }
    }

    /// Instantiate the strategy described by `options`.
    ///
    /// Fails with [`QuantizeError::MatrixSize`] when Bayer is selected with
    /// an invalid `matrix_size`; other strategies ignore that field.
    pub fn strategy(self, options: &DitherOptions) -> Result<Box<dyn Dither>, QuantizeError> {
        Ok(match self {
            DitherAlgorithm::Bayer => Box::new(OrderedDither::new(Bayer::new(
                options.matrix_size,
                options.spread,
            )?)),
            DitherAlgorithm::ClusteredDot => Box::new(OrderedDither::new(ClusteredDot {
                spread: options.spread,
            })),
            DitherAlgorithm::RandomNoise => Box::new(OrderedDither::new(RandomNoise {
                seed: options.seed,
                spread: options.spread,
            })),
            DitherAlgorithm::FloydSteinberg => Box::new(
                ErrorDiffusion::floyd_steinberg()
                    .serpentine(options.serpentine)
                    .error_clamp(options.error_clamp),
            ),
            DitherAlgorithm::Atkinson => Box::new(
                ErrorDiffusion::atkinson()
                    .serpentine(options.serpentine)
                    .error_clamp(options.error_clamp),
            ),
        })
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DitherAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        DitherAlgorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = DitherAlgorithm::ALL.iter().map(|a| a.name()).collect();
                format!("unknown dither algorithm '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A pixel-to-palette mapping strategy.
///
/// Implementations must be deterministic: the same image, dimensions and
/// palette always produce the same indices.
pub trait Dither {
    /// Map row-major linear pixels to palette indices, one per pixel, each
    /// in `0..palette.len()`.
    fn dither(
        &self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
    ) -> Vec<u8>;
}

/// Sliding window of error rows for error diffusion.
///
/// Holds only the rows a kernel can reach (`max_dy + 1`), with `rows[0]`
/// being the row currently scanned.
#[derive(Debug)]
pub struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error collected so far for column `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to column `x`, `row_offset` rows below the current one.
    /// Out-of-range targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            let cell = &mut self.rows[row_offset][x];
            for c in 0..3 {
                cell[c] += error[c];
            }
        }
    }

    /// Drop the current row and open a zeroed one at the far end.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Dither `image` against `palette`.
///
/// The raster has the image's own dimensions and borrows `palette`; every
/// index refers to an entry of it. Identical inputs give identical output.
///
/// # Errors
///
/// - [`QuantizeError::EmptyPalette`] if `palette` has no entries
/// - [`QuantizeError::MatrixSize`] for a Bayer size that is not a power of two in `2..=MAX_MATRIX_SIZE`
pub fn dither<'p>(
    image: &PixelGrid,
    palette: &'p Palette,
    options: &DitherOptions,
) -> Result<PalettedRaster<'p>, QuantizeError> {
    if palette.is_empty() {
        return Err(QuantizeError::EmptyPalette);
    }

    let strategy = options.algorithm.strategy(options)?;
    let linear: Vec<LinearRgb> = image.pixels().iter().map(|&p| LinearRgb::from(p)).collect();
    let indices = strategy.dither(&linear, image.width(), image.height(), palette);

    tracing::debug!(
        algorithm = %options.algorithm,
        width = image.width(),
        height = image.height(),
        colors = palette.len(),
        "Dithered image"
    );
    Ok(PalettedRaster::new(indices, image.width(), image.height(), palette))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    #[test]
    fn test_error_buffer_creation() {
        let buf = ErrorBuffer::new(100, 3);
        assert_eq!(buf.rows.len(), 3);
        assert_eq!(buf.width, 100);
        assert!(buf.rows.iter().flatten().all(|p| *p == [0.0; 3]));
    }

    #[test]
    fn test_error_buffer_accumulates() {
        let mut buf = ErrorBuffer::new(10, 2);
        buf.add_error(5, 0, [0.1, 0.2, 0.3]);
        buf.add_error(5, 0, [0.1, 0.1, 0.1]);
        let acc = buf.get_accumulated(5);
        assert!((acc[0] - 0.2).abs() < 1e-6);
        assert!((acc[1] - 0.3).abs() < 1e-6);
        assert!((acc[2] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_error_buffer_advance_row() {
        let mut buf = ErrorBuffer::new(4, 3);
        buf.add_error(0, 0, [1.0, 0.0, 0.0]);
        buf.add_error(0, 1, [2.0, 0.0, 0.0]);
        buf.add_error(0, 2, [3.0, 0.0, 0.0]);
        buf.advance_row();
        assert_eq!(buf.rows[0][0][0], 2.0);
        assert_eq!(buf.rows[1][0][0], 3.0);
        assert_eq!(buf.rows[2][0][0], 0.0);
    }

    #[test]
    fn test_error_buffer_ignores_out_of_range() {
        let mut buf = ErrorBuffer::new(10, 2);
        buf.add_error(100, 0, [1.0; 3]);
        buf.add_error(0, 10, [1.0; 3]);
        assert!(buf.rows.iter().flatten().all(|p| *p == [0.0; 3]));
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in DitherAlgorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<DitherAlgorithm>(), Ok(algorithm));
        }
        assert_eq!("Floyd_Steinberg".parse::<DitherAlgorithm>(), Ok(DitherAlgorithm::FloydSteinberg));
        assert!("ordered".parse::<DitherAlgorithm>().is_err());
    }

    #[test]
    fn test_strategy_validates_bayer_size_only() {
        let bad = DitherOptions::new().matrix_size(12);
        assert!(matches!(
            DitherAlgorithm::Bayer.strategy(&bad),
            Err(QuantizeError::MatrixSize(12))
        ));
        for algorithm in &DitherAlgorithm::ALL[1..] {
            assert!(algorithm.strategy(&bad).is_ok(), "{algorithm}");
        }
    }

    #[test]
    fn test_dither_rejects_empty_palette() {
        let palette = Palette::from_distinct(Vec::new());
        let grid = PixelGrid::new(vec![Srgb::WHITE; 4], 2, 2).unwrap();
        assert!(matches!(
            dither(&grid, &palette, &DitherOptions::default()),
            Err(QuantizeError::EmptyPalette)
        ));
    }

    #[test]
    fn test_dither_keeps_image_dimensions() {
        let palette = Palette::from_hex(&["#000000", "#ffffff", "#3366cc"]).unwrap();
        let grid = PixelGrid::new(vec![Srgb::from_u8(40, 90, 180); 15], 5, 3).unwrap();
        for algorithm in DitherAlgorithm::ALL {
            let options = DitherOptions::new().algorithm(algorithm);
            let raster = dither(&grid, &palette, &options).unwrap();
            assert_eq!((raster.width(), raster.height()), (5, 3));
            assert!(raster.indices().iter().all(|&i| (i as usize) < palette.len()));
        }
    }
}
