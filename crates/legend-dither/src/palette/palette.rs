//! Ordered palette with precomputed color spaces and nearest-color matching.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{LinearRgb, Oklab, Srgb};

/// Largest palette a [`PalettedRaster`](crate::output::PalettedRaster) can index.
pub const MAX_COLORS: usize = 256;

/// Distance metric for palette color matching.
///
/// Every metric breaks ties by palette order: the lowest index wins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceMetric {
    /// Squared Euclidean distance in Oklab.
    #[default]
    Euclidean,

    /// HyAB hybrid distance (Abasi et al., 2020):
    /// `kl * |dL| + kc * sqrt(da² + db²)`.
    ///
    /// Weighting lightness separately keeps greys from landing on saturated
    /// entries of similar lightness. `kl: 2.0, kc: 1.0` is a good start.
    HyAB {
        /// Lightness weight
        kl: f32,
        /// Chrominance weight
        kc: f32,
    },
}

/// An ordered set of distinct sRGB colors.
///
/// Order is meaningful: it is the order of the legend swatches and the
/// index space of every [`PalettedRaster`](crate::output::PalettedRaster)
/// built against this palette. A palette never changes after construction,
/// so it is shared by reference between the ditherer and the composer.
///
/// Linear and Oklab forms of every entry are computed once here, keeping
/// per-pixel matching free of conversions.
///
/// # Example
///
/// ```
/// use legend_dither::{Palette, Srgb};
///
/// let palette = Palette::new(&[Srgb::from_u8(0, 0, 0), Srgb::from_u8(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.to_hex_string(), "#000000#ffffff");
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    srgb: Vec<Srgb>,
    linear: Vec<LinearRgb>,
    oklab: Vec<Oklab>,
    distance_metric: DistanceMetric,
}

impl Palette {
    /// Build a palette from colors in the order given.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] above [`MAX_COLORS`] entries
    /// - [`PaletteError::DuplicateColor`] if two entries share the same
    ///   8-bit value
    pub fn new(colors: &[Srgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_COLORS {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
            });
        }

        let mut seen = HashSet::new();
        for (index, color) in colors.iter().enumerate() {
            if !seen.insert(color.to_bytes()) {
                return Err(PaletteError::DuplicateColor { index });
            }
        }

        Ok(Self::from_distinct(colors.to_vec()))
    }

    /// Build without validation. Callers guarantee `colors` is non-empty,
    /// free of duplicates and no longer than [`MAX_COLORS`].
    pub(crate) fn from_distinct(colors: Vec<Srgb>) -> Self {
        let linear: Vec<LinearRgb> = colors.iter().map(|&c| LinearRgb::from(c)).collect();
        let oklab = linear.iter().map(|&l| Oklab::from(l)).collect();
        Self {
            srgb: colors,
            linear,
            oklab,
            distance_metric: DistanceMetric::default(),
        }
    }

    /// Parse hex strings such as `"#FF0000"` or `"#F00"`.
    ///
    /// ```
    /// use legend_dither::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000000", "#FFFFFF", "#FF0000"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// ```
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let srgb = colors
            .iter()
            .enumerate()
            .map(|(index, text)| {
                Srgb::from_str(text).map_err(|source| PaletteError::ParseColor {
                    index,
                    text: text.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&srgb)
    }

    /// Parse a run of hex colors separated by `#`, e.g. `#FF0000#00FF00#0000FF`.
    ///
    /// Entries keep their literal order. Whitespace around entries is
    /// ignored, and so are empty segments (a leading `#`, or `##`).
    ///
    /// ```
    /// use legend_dither::Palette;
    ///
    /// let palette = Palette::parse("#FF0000#00FF00#0000FF").unwrap();
    /// assert_eq!(palette.srgb(1).to_bytes(), [0, 255, 0]);
    /// ```
    pub fn parse(text: &str) -> Result<Self, PaletteError> {
        let entries: Vec<&str> = text
            .split('#')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        Self::from_hex(&entries)
    }

    /// Override the distance metric used by [`find_nearest`](Self::find_nearest).
    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.distance_metric
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.srgb.len()
    }

    /// Always `false` for palettes built through [`Palette::new`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.srgb.is_empty()
    }

    #[inline]
    pub fn srgb(&self, idx: usize) -> Srgb {
        self.srgb[idx]
    }

    #[inline]
    pub fn linear(&self, idx: usize) -> LinearRgb {
        self.linear[idx]
    }

    #[inline]
    pub fn oklab(&self, idx: usize) -> Oklab {
        self.oklab[idx]
    }

    /// The colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Srgb] {
        &self.srgb
    }

    pub fn iter(&self) -> impl Iterator<Item = Srgb> + '_ {
        self.srgb.iter().copied()
    }

    /// Position of the entry with the same 8-bit value, if any.
    pub fn index_of(&self, color: Srgb) -> Option<usize> {
        let bytes = color.to_bytes();
        self.srgb.iter().position(|c| c.to_bytes() == bytes)
    }

    /// Distance between two Oklab colors under the configured metric.
    #[inline]
    pub fn distance(&self, a: Oklab, b: Oklab) -> f32 {
        match self.distance_metric {
            DistanceMetric::Euclidean => a.distance_squared(b),
            DistanceMetric::HyAB { kl, kc } => a.hyab_distance(b, kl, kc),
        }
    }

    /// Find the palette entry closest to `color`.
    ///
    /// Returns `(index, distance)`. Ties go to the lowest index, so the
    /// result depends only on the inputs and the palette order.
    ///
    /// ```
    /// use legend_dither::{Oklab, Palette, Srgb};
    ///
    /// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
    /// let (idx, _) = palette.find_nearest(Oklab::from(Srgb::from_u8(30, 30, 30)));
    /// assert_eq!(idx, 0);
    /// ```
    #[inline]
    pub fn find_nearest(&self, color: Oklab) -> (usize, f32) {
        let mut best_idx = 0;
        let mut best_dist = f32::MAX;

        for (i, &entry) in self.oklab.iter().enumerate() {
            let dist = self.distance(color, entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }

    /// Each entry as lowercase `#rrggbb`, in palette order.
    pub fn hex_colors(&self) -> Vec<String> {
        self.srgb.iter().map(|c| c.to_hex()).collect()
    }

    /// The palette in the form [`Palette::parse`] accepts.
    pub fn to_hex_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.srgb {
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

impl FromStr for Palette {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
