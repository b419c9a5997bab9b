//! Palette extraction: cluster, boost, reserve, sort.

use std::cmp::Ordering;
use std::collections::HashSet;

use thiserror::Error;

use super::kmeans;
use super::{Palette, MAX_COLORS};
use crate::api::QuantizeError;
use crate::color::{HclBoost, Oklab, Oklch, Srgb};
use crate::grid::PixelGrid;

/// Below this chroma a color sorts as a pure grey (chroma 0, hue 0).
const ACHROMATIC_CHROMA: f32 = 1e-4;

/// Why clustering could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClusteringError {
    /// `k` was zero
    #[error("requested palette size must be at least 1")]
    EmptyTarget,
    /// `k` exceeds what an indexed raster can address
    #[error("requested palette size {k} exceeds {max}", max = super::MAX_COLORS)]
    TargetTooLarge { k: usize },
    /// The (possibly cropped) image has no finite pixels to cluster
    #[error("image has no usable pixels")]
    NoUsablePixels,
}

/// Knobs for [`extract`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Requested palette size before reservations.
    pub k: usize,
    /// Append pure black after clustering (takes one cluster slot).
    pub reserve_black: bool,
    /// Append pure white after clustering (takes one cluster slot).
    pub reserve_white: bool,
    /// Cluster only the central half of each dimension.
    pub crop: bool,
    /// Upper bound on clustered samples; 0 means every pixel.
    pub sample_cap: usize,
    /// Seed for centroid initialization.
    pub seed: u64,
    /// Adjustment applied to every centroid.
    pub boost: HclBoost,
    /// Upper bound on Lloyd iterations.
    pub max_iterations: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            k: 8,
            reserve_black: false,
            reserve_white: false,
            crop: false,
            sample_cap: 512 * 512,
            seed: 0,
            boost: HclBoost::default(),
            max_iterations: 64,
        }
    }
}

impl ExtractOptions {
    /// Number of clusters actually requested from k-means: one slot less per
    /// reserved color, but never below one.
    pub fn cluster_target(&self) -> usize {
        let reserved = self.reserve_black as usize + self.reserve_white as usize;
        self.k.saturating_sub(reserved).max(1)
    }

    /// The 8-bit colors appended after clustering.
    fn reserved_colors(&self) -> Vec<[u8; 3]> {
        let mut colors = Vec::with_capacity(2);
        if self.reserve_black {
            colors.push(Srgb::BLACK.to_bytes());
        }
        if self.reserve_white {
            colors.push(Srgb::WHITE.to_bytes());
        }
        colors
    }
}

/// Derive an ordered palette from `image`.
///
/// Pixels are clustered in Oklab, skipping pixels that already equal a
/// reserved color so no cluster is spent on them. Each centroid is boosted with
/// [`Oklch::hcl_adjust`] and rounded to 8 bits, reserved black/white are
/// appended, duplicates are dropped and the set is stable-sorted by
/// (chroma, hue, lightness). The image is never modified.
///
/// # Errors
///
/// - [`ClusteringError::EmptyTarget`] when `k == 0`
/// - [`ClusteringError::TargetTooLarge`] when `k` exceeds [`MAX_COLORS`]
/// - [`ClusteringError::NoUsablePixels`] when there is nothing to cluster
/// - [`QuantizeError::ColorConversion`] when a centroid has no finite RGB form
///
/// # Example
///
/// ```
/// use legend_dither::{extract, ExtractOptions, PixelGrid, Srgb};
///
/// let pixels = vec![
///     Srgb::from_u8(255, 0, 0),
///     Srgb::from_u8(255, 0, 0),
///     Srgb::from_u8(0, 255, 0),
///     Srgb::from_u8(0, 0, 255),
/// ];
/// let grid = PixelGrid::new(pixels, 2, 2).unwrap();
/// let palette = extract(&grid, &ExtractOptions { k: 3, ..Default::default() }).unwrap();
/// assert_eq!(palette.len(), 3);
/// ```
pub fn extract(image: &PixelGrid, options: &ExtractOptions) -> Result<Palette, QuantizeError> {
    if options.k == 0 {
        return Err(ClusteringError::EmptyTarget.into());
    }
    if options.k > MAX_COLORS {
        return Err(ClusteringError::TargetTooLarge { k: options.k }.into());
    }

    let cropped;
    let source = if options.crop {
        cropped = image.crop_center();
        &cropped
    } else {
        image
    };

    let reserved = options.reserved_colors();
    let unreserved: Vec<Srgb> = source
        .pixels()
        .iter()
        .copied()
        .filter(|p| !reserved.contains(&p.to_bytes()))
        .collect();
    // an image made only of reserved colors still clusters into them
    let pool = if unreserved.iter().any(|p| p.is_finite()) {
        &unreserved[..]
    } else {
        source.pixels()
    };

    let samples = sample(pool, options.sample_cap);
    if samples.is_empty() {
        return Err(ClusteringError::NoUsablePixels.into());
    }

    let target = options.cluster_target();
    let clusters = kmeans::run(&samples, target, options.max_iterations, options.seed);
    if clusters.centroids.len() < target {
        tracing::warn!(
            requested = target,
            found = clusters.centroids.len(),
            "Image has fewer distinct colors than requested"
        );
    }

    let mut colors = Vec::with_capacity(clusters.centroids.len() + 2);
    for (index, centroid) in clusters.centroids.iter().enumerate() {
        colors.push(boosted(*centroid, options.boost, index)?);
    }
    if options.reserve_black {
        colors.push(Srgb::BLACK);
    }
    if options.reserve_white {
        colors.push(Srgb::WHITE);
    }

    let mut colors = dedup_keep_last(colors);
    sort_by_chroma_hue_lightness(&mut colors);

    tracing::debug!(
        colors = colors.len(),
        samples = samples.len(),
        "Extracted palette"
    );
    Ok(Palette::from_distinct(colors))
}

/// Collect finite pixels as Oklab, taking an evenly strided subset when
/// there are more than `cap`.
fn sample(pixels: &[Srgb], cap: usize) -> Vec<Oklab> {
    let usable: Vec<Srgb> = pixels.iter().copied().filter(|p| p.is_finite()).collect();
    if cap == 0 || usable.len() <= cap {
        return usable.into_iter().map(Oklab::from).collect();
    }

    let step = usable.len() as f64 / cap as f64;
    (0..cap)
        .map(|i| Oklab::from(usable[(i as f64 * step) as usize]))
        .collect()
}

fn boosted(centroid: Oklab, boost: HclBoost, index: usize) -> Result<Srgb, QuantizeError> {
    if !centroid.is_finite() {
        return Err(QuantizeError::ColorConversion { index });
    }
    let srgb = Srgb::from(Oklch::from(centroid).hcl_adjust(boost));
    if !srgb.is_finite() {
        return Err(QuantizeError::ColorConversion { index });
    }
    Ok(Srgb::from_bytes(srgb.to_bytes()))
}

/// Drop repeated 8-bit colors. Later entries win, so a reserved black or
/// white replaces a cluster that rounded to the same value.
fn dedup_keep_last(colors: Vec<Srgb>) -> Vec<Srgb> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Srgb> = colors
        .into_iter()
        .rev()
        .filter(|c| seen.insert(c.to_bytes()))
        .collect();
    kept.reverse();
    kept
}

fn sort_key(color: Srgb) -> (f32, f32, f32) {
    let lch = Oklch::from(color);
    if lch.c < ACHROMATIC_CHROMA {
        (0.0, 0.0, lch.l)
    } else {
        (lch.c, lch.hue_degrees(), lch.l)
    }
}

/// Stable ascending sort by chroma, then hue in degrees, then lightness.
pub fn sort_by_chroma_hue_lightness(colors: &mut [Srgb]) {
    colors.sort_by(|a, b| compare_keys(sort_key(*a), sort_key(*b)));
}

fn compare_keys(a: (f32, f32, f32), b: (f32, f32, f32)) -> Ordering {
    a.0.total_cmp(&b.0)
        .then(a.1.total_cmp(&b.1))
        .then(a.2.total_cmp(&b.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(colors: &[[u8; 3]], width: usize, height: usize) -> PixelGrid {
        PixelGrid::new(colors.iter().map(|&c| Srgb::from_bytes(c)).collect(), width, height)
            .unwrap()
    }

    fn gradient(width: usize, height: usize) -> PixelGrid {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(Srgb::from_u8(
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    ((x + y) * 97 % 256) as u8,
                ));
            }
        }
        PixelGrid::new(pixels, width, height).unwrap()
    }

    #[test]
    fn test_cluster_target_arithmetic() {
        let opts = |k, black, white| ExtractOptions {
            k,
            reserve_black: black,
            reserve_white: white,
            ..Default::default()
        };
        assert_eq!(opts(8, false, false).cluster_target(), 8);
        assert_eq!(opts(8, true, false).cluster_target(), 7);
        assert_eq!(opts(8, true, true).cluster_target(), 6);
        assert_eq!(opts(2, true, true).cluster_target(), 1);
        assert_eq!(opts(1, true, true).cluster_target(), 1);
    }

    #[test]
    fn test_zero_k_is_clustering_error() {
        let image = grid(&[[1, 2, 3]], 1, 1);
        let err = extract(&image, &ExtractOptions { k: 0, ..Default::default() }).unwrap_err();
        assert!(matches!(err, QuantizeError::Clustering(ClusteringError::EmptyTarget)));
    }

    #[test]
    fn test_oversized_k_is_clustering_error() {
        let image = grid(&[[1, 2, 3]], 1, 1);
        let err = extract(&image, &ExtractOptions { k: 257, ..Default::default() }).unwrap_err();
        assert!(matches!(
            err,
            QuantizeError::Clustering(ClusteringError::TargetTooLarge { k: 257 })
        ));
    }

    #[test]
    fn test_empty_image_is_clustering_error() {
        let image = PixelGrid::new(Vec::new(), 0, 0).unwrap();
        let err = extract(&image, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, QuantizeError::Clustering(ClusteringError::NoUsablePixels)));
    }

    #[test]
    fn test_non_finite_pixels_are_not_usable() {
        let image = PixelGrid::new(vec![Srgb::new(f32::NAN, 0.0, 0.0); 4], 2, 2).unwrap();
        let err = extract(&image, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, QuantizeError::Clustering(ClusteringError::NoUsablePixels)));
    }

    #[test]
    fn test_non_finite_centroid_is_conversion_error() {
        let err = boosted(Oklab::new(f32::NAN, 0.0, 0.0), HclBoost::default(), 3).unwrap_err();
        assert!(matches!(err, QuantizeError::ColorConversion { index: 3 }));
    }

    #[test]
    fn test_returns_k_distinct_sorted_colors() {
        let image = gradient(32, 24);
        let palette = extract(&image, &ExtractOptions::default()).unwrap();
        assert_eq!(palette.len(), 8);

        let mut seen = HashSet::new();
        for c in palette.iter() {
            assert!(seen.insert(c.to_bytes()), "duplicate {c}");
        }
        for pair in palette.colors().windows(2) {
            assert_ne!(
                compare_keys(sort_key(pair[0]), sort_key(pair[1])),
                Ordering::Greater,
                "{} sorted before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_reserved_colors_appended() {
        let image = gradient(32, 24);
        let opts = ExtractOptions {
            k: 6,
            reserve_black: true,
            reserve_white: true,
            ..Default::default()
        };
        let palette = extract(&image, &opts).unwrap();
        assert_eq!(palette.len(), 6);
        assert!(palette.index_of(Srgb::BLACK).is_some());
        assert!(palette.index_of(Srgb::WHITE).is_some());
        // greys sort first, darkest first
        assert_eq!(palette.srgb(0), Srgb::BLACK);
        assert_eq!(palette.srgb(1), Srgb::WHITE);
    }

    #[test]
    fn test_reserved_black_border_does_not_cost_a_cluster() {
        // left half pure black, right half 128 distinct colors
        let mut pixels = Vec::with_capacity(256);
        for y in 0..16u8 {
            for x in 0..16u8 {
                pixels.push(if x < 8 {
                    [0, 0, 0]
                } else {
                    [40 + x * 12, 30 + y * 12, 160 - y * 4]
                });
            }
        }
        let image = grid(&pixels, 16, 16);
        for seed in 0..5 {
            let opts = ExtractOptions {
                k: 4,
                reserve_black: true,
                seed,
                ..Default::default()
            };
            let palette = extract(&image, &opts).unwrap();
            assert_eq!(palette.len(), 4, "seed {seed}: {palette}");
            assert_eq!(palette.srgb(0), Srgb::BLACK);
        }
    }

    #[test]
    fn test_only_reserved_pixels_still_extracts() {
        let image = grid(&[[0, 0, 0]; 4], 2, 2);
        let opts = ExtractOptions {
            k: 3,
            reserve_black: true,
            ..Default::default()
        };
        let palette = extract(&image, &opts).unwrap();
        assert_eq!(palette.hex_colors(), vec!["#000000"]);
    }

    #[test]
    fn test_reservation_floor_keeps_one_cluster() {
        let image = grid(&[[200, 30, 30]; 4], 2, 2);
        let opts = ExtractOptions {
            k: 1,
            reserve_black: true,
            reserve_white: true,
            ..Default::default()
        };
        assert_eq!(extract(&image, &opts).unwrap().len(), 3);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let image = gradient(40, 30);
        let opts = ExtractOptions { seed: 99, ..Default::default() };
        let a = extract(&image, &opts).unwrap();
        let b = extract(&image, &opts).unwrap();
        assert_eq!(a.hex_colors(), b.hex_colors());
    }

    #[test]
    fn test_does_not_mutate_input() {
        let image = gradient(16, 16);
        let before = image.clone();
        extract(&image, &ExtractOptions::default()).unwrap();
        assert_eq!(image, before);
    }

    #[test]
    fn test_fewer_distinct_colors_than_k() {
        let image = grid(&[[255, 0, 0], [0, 0, 255], [255, 0, 0], [0, 0, 255]], 2, 2);
        let palette = extract(&image, &ExtractOptions::default()).unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn test_crop_ignores_border() {
        // 4x4 image: white border, red 2x2 center
        let w = [255, 255, 255];
        let r = [220, 20, 20];
        let image = grid(
            &[w, w, w, w, w, r, r, w, w, r, r, w, w, w, w, w],
            4,
            4,
        );
        let opts = ExtractOptions {
            k: 2,
            crop: true,
            ..Default::default()
        };
        let palette = extract(&image, &opts).unwrap();
        assert_eq!(palette.len(), 1);
        assert!(palette.srgb(0).r > 0.8 && palette.srgb(0).g < 0.2);
    }

    #[test]
    fn test_sample_cap_strides_evenly() {
        let pixels: Vec<Srgb> = (0..100).map(|i| Srgb::from_u8(i as u8, 0, 0)).collect();
        let samples = sample(&pixels, 10);
        assert_eq!(samples.len(), 10);
        assert_eq!(samples[0], Oklab::from(pixels[0]));
        assert_eq!(samples[9], Oklab::from(pixels[90]));
        assert_eq!(sample(&pixels, 0).len(), 100);
        assert_eq!(sample(&pixels, 500).len(), 100);
    }

    #[test]
    fn test_dedup_prefers_later_entries() {
        let kept = dedup_keep_last(vec![
            Srgb::from_u8(0, 0, 0),
            Srgb::from_u8(9, 9, 9),
            Srgb::BLACK,
        ]);
        assert_eq!(kept, vec![Srgb::from_u8(9, 9, 9), Srgb::BLACK]);
    }

    #[test]
    fn test_sort_is_chroma_then_hue_then_lightness() {
        let mut colors = vec![
            Srgb::from_u8(0, 0, 255),
            Srgb::WHITE,
            Srgb::from_u8(255, 0, 0),
            Srgb::from_u8(128, 128, 128),
            Srgb::BLACK,
        ];
        sort_by_chroma_hue_lightness(&mut colors);
        assert_eq!(
            colors,
            vec![
                Srgb::BLACK,
                Srgb::from_u8(128, 128, 128),
                Srgb::WHITE,
                Srgb::from_u8(255, 0, 0),
                Srgb::from_u8(0, 0, 255),
            ]
        );
    }
}
