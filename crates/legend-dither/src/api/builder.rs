//! Quantizer builder: the whole pipeline behind one configurable value.

use crate::color::HclBoost;
use crate::dither::{dither, DitherAlgorithm, DitherOptions};
use crate::grid::PixelGrid;
use crate::output::{compose, LegendMode, PalettedRaster};
use crate::palette::{extract, DistanceMetric, ExtractOptions, Palette};

use super::QuantizeError;

/// Palette extraction, dithering and legend composition with one set of
/// options.
///
/// Configuration methods consume and return `self`; the pipeline methods
/// take `&self`, so one quantizer can process any number of images.
/// Palettes built by [`extract_palette`](Self::extract_palette) and
/// [`parse_palette`](Self::parse_palette) carry the configured
/// [`DistanceMetric`].
///
/// # Example
///
/// ```
/// use legend_dither::{LegendMode, PixelGrid, Quantizer, Srgb};
///
/// let pixels: Vec<Srgb> = (0..64)
///     .map(|i| Srgb::from_u8((i * 4) as u8, 90, 255 - (i * 4) as u8))
///     .collect();
/// let grid = PixelGrid::new(pixels, 8, 8).unwrap();
///
/// let quantizer = Quantizer::new().colors(4).legend(LegendMode::Proportional);
/// let palette = quantizer.extract_palette(&grid).unwrap();
/// let canvas = quantizer.render(&grid, &palette).unwrap();
///
/// assert_eq!((canvas.width(), canvas.height()), (16, 8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    extract: ExtractOptions,
    dither: DitherOptions,
    legend: LegendMode,
    metric: DistanceMetric,
}

impl Quantizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all extraction settings at once.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    /// Replace all dithering settings at once.
    pub fn with_dither_options(mut self, options: DitherOptions) -> Self {
        self.dither = options;
        self
    }

    /// Requested palette size, including reserved colors.
    #[inline]
    pub fn colors(mut self, k: usize) -> Self {
        self.extract.k = k;
        self
    }

    #[inline]
    pub fn reserve_black(mut self, enabled: bool) -> Self {
        self.extract.reserve_black = enabled;
        self
    }

    #[inline]
    pub fn reserve_white(mut self, enabled: bool) -> Self {
        self.extract.reserve_white = enabled;
        self
    }

    #[inline]
    pub fn crop(mut self, enabled: bool) -> Self {
        self.extract.crop = enabled;
        self
    }

    #[inline]
    pub fn sample_cap(mut self, cap: usize) -> Self {
        self.extract.sample_cap = cap;
        self
    }

    #[inline]
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.extract.max_iterations = iterations;
        self
    }

    #[inline]
    pub fn boost(mut self, boost: HclBoost) -> Self {
        self.extract.boost = boost;
        self
    }

    /// Seed both centroid initialization and random-noise thresholds.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.extract.seed = seed;
        self.dither.seed = seed;
        self
    }

    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.dither.algorithm = algorithm;
        self
    }

    #[inline]
    pub fn matrix_size(mut self, size: usize) -> Self {
        self.dither.matrix_size = size;
        self
    }

    #[inline]
    pub fn spread(mut self, spread: f32) -> Self {
        self.dither.spread = spread;
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.dither.serpentine = enabled;
        self
    }

    #[inline]
    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.dither.error_clamp = clamp;
        self
    }

    #[inline]
    pub fn legend(mut self, mode: LegendMode) -> Self {
        self.legend = mode;
        self
    }

    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn extract_options(&self) -> &ExtractOptions {
        &self.extract
    }

    pub fn dither_options(&self) -> &DitherOptions {
        &self.dither
    }

    pub fn legend_mode(&self) -> LegendMode {
        self.legend
    }

    /// Cluster `image` into an ordered palette.
    pub fn extract_palette(&self, image: &PixelGrid) -> Result<Palette, QuantizeError> {
        Ok(extract(image, &self.extract)?.with_distance_metric(self.metric))
    }

    /// Parse an explicit `#RRGGBB#RRGGBB…` palette, skipping clustering.
    pub fn parse_palette(&self, text: &str) -> Result<Palette, QuantizeError> {
        Ok(Palette::parse(text)?.with_distance_metric(self.metric))
    }

    /// Dither `image` against `palette` without a legend.
    pub fn dither<'p>(
        &self,
        image: &PixelGrid,
        palette: &'p Palette,
    ) -> Result<PalettedRaster<'p>, QuantizeError> {
        dither(image, palette, &self.dither)
    }

    /// Dither `image` and append the legend strip.
    pub fn render<'p>(
        &self,
        image: &PixelGrid,
        palette: &'p Palette,
    ) -> Result<PalettedRaster<'p>, QuantizeError> {
        let raster = self.dither(image, palette)?;
        compose(&raster, palette, image.width(), image.height(), self.legend)
    }
}
