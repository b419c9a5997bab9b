//! Indexed raster plus per-color usage counts.

use crate::color::Srgb;
use crate::palette::Palette;

/// A grid of palette indices.
///
/// Holds one `u8` index per pixel in row-major order and borrows the
/// palette those indices refer to, so every pixel is a palette member by
/// construction.
///
/// # Example
///
/// ```
/// use legend_dither::{Palette, PalettedRaster};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let raster = PalettedRaster::new(vec![0, 1, 1, 0], 2, 2, &palette);
///
/// assert_eq!(raster.color(1, 0).to_bytes(), [255, 255, 255]);
/// assert_eq!(raster.usage().count(1), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PalettedRaster<'p> {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: &'p Palette,
}

impl<'p> PalettedRaster<'p> {
    /// Wrap indices.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height` and that every
    /// index is below `palette.len()`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: &'p Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match {width}x{height}",
            indices.len(),
        );
        debug_assert!(indices.iter().all(|&i| (i as usize) < palette.len()));
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// A raster of one color.
    pub fn filled(width: usize, height: usize, index: u8, palette: &'p Palette) -> Self {
        Self::new(vec![index; width * height], width, height, palette)
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &'p Palette {
        self.palette
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.indices[y * self.width + x]
    }

    #[inline]
    pub fn color(&self, x: usize, y: usize) -> Srgb {
        self.palette.srgb(self.get(x, y) as usize)
    }

    /// Pixel count per palette entry.
    pub fn usage(&self) -> UsageStatistics {
        let mut counts = vec![0usize; self.palette.len()];
        for &i in &self.indices {
            counts[i as usize] += 1;
        }
        UsageStatistics { counts }
    }

    /// Packed `[r, g, b, r, g, b, ...]` bytes.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &idx in &self.indices {
            rgb.extend_from_slice(&self.palette.srgb(idx as usize).to_bytes());
        }
        rgb
    }

    /// Copy `source` with its top-left corner at `(x, y)`, clipped to this
    /// raster. Both rasters must index the same palette.
    pub(crate) fn blit(&mut self, source: &PalettedRaster<'_>, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = source.width.min(self.width - x);
        for row in 0..source.height.min(self.height - y) {
            let src = &source.indices[row * source.width..row * source.width + w];
            let start = (y + row) * self.width + x;
            self.indices[start..start + w].copy_from_slice(src);
        }
    }

    /// Overwrite a rectangle with one index, clipped to this raster.
    pub(crate) fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, index: u8) {
        debug_assert!((index as usize) < self.palette.len());
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.indices[start + x.min(x_end)..start + x_end].fill(index);
        }
    }
}

/// How many pixels use each palette entry.
///
/// Derived from a raster on demand and never stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageStatistics {
    counts: Vec<usize>,
}

impl UsageStatistics {
    #[inline]
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Fraction of all pixels using `index`; 0.0 when there are no pixels.
    pub fn share(&self, index: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(index) as f64 / total as f64,
        }
    }
}
