//! Threshold maps for ordered dithering.
//!
//! A [`ThresholdMap`] answers one question: how far should pixel `(x, y)`
//! be pushed before it is matched against the palette. All maps here share
//! the same law, `offset = (t(x, y) - 0.5) * spread` with `t` in `[0, 1)`,
//! and differ only in where `t` comes from.

use crate::api::QuantizeError;

/// Largest accepted Bayer side (65536 thresholds).
pub const MAX_MATRIX_SIZE: usize = 256;

/// Per-pixel perturbation for ordered dithering.
pub trait ThresholdMap {
    /// Offset added to each linear channel of pixel `(x, y)`.
    fn offset(&self, x: usize, y: usize) -> f32;
}

/// Recursive Bayer matrix of side `size` (a power of two).
///
/// Each doubling step places four scaled copies of the previous matrix:
///
/// ```text
/// 4M + 0   4M + 2
/// 4M + 3   4M + 1
/// ```
///
/// so the `size²` thresholds are exactly `0, 1, ..., size² - 1` divided by
/// `size²`, evenly covering `[0, 1)` within every tile.
#[derive(Debug, Clone)]
pub struct Bayer {
    size: usize,
    spread: f32,
    thresholds: Vec<f32>,
}

impl Bayer {
    /// Build a `size × size` matrix.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::MatrixSize`] unless `size` is a power of two in
    /// `2..=MAX_MATRIX_SIZE`.
    pub fn new(size: usize, spread: f32) -> Result<Self, QuantizeError> {
        if !(2..=MAX_MATRIX_SIZE).contains(&size) || !size.is_power_of_two() {
            return Err(QuantizeError::MatrixSize(size));
        }

        let mut matrix = vec![0u32];
        let mut n = 1;
        while n < size {
            let mut next = vec![0u32; 4 * n * n];
            let side = 2 * n;
            for y in 0..n {
                for x in 0..n {
                    let v = 4 * matrix[y * n + x];
                    next[y * side + x] = v;
                    next[y * side + x + n] = v + 2;
                    next[(y + n) * side + x] = v + 3;
                    next[(y + n) * side + x + n] = v + 1;
                }
            }
            matrix = next;
            n = side;
        }

        let cells = (size * size) as f32;
        Ok(Self {
            size,
            spread,
            thresholds: matrix.into_iter().map(|m| m as f32 / cells).collect(),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Threshold `t` in `[0, 1)` at `(x, y)`, wrapping every `size` pixels.
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> f32 {
        self.thresholds[(y % self.size) * self.size + (x % self.size)]
    }
}

impl ThresholdMap for Bayer {
    #[inline]
    fn offset(&self, x: usize, y: usize) -> f32 {
        (self.threshold(x, y) - 0.5) * self.spread
    }
}

/// Classic 4×4 clustered-dot screen. Thresholds grow outward from the
/// center so neighboring "on" pixels clump into dots.
const CLUSTERED_DOT_4: [[u8; 4]; 4] = [
    [12, 5, 6, 13],
    [4, 0, 1, 7],
    [11, 3, 2, 8],
    [15, 10, 9, 14],
];

#[derive(Debug, Clone, Copy)]
pub struct ClusteredDot {
    pub spread: f32,
}

impl ThresholdMap for ClusteredDot {
    #[inline]
    fn offset(&self, x: usize, y: usize) -> f32 {
        let t = CLUSTERED_DOT_4[y % 4][x % 4] as f32 / 16.0;
        (t - 0.5) * self.spread
    }
}

/// White-noise thresholds hashed from `(seed, x, y)`.
///
/// Stateless, so the value at a pixel never depends on scan order and the
/// same seed always reproduces the same pattern.
#[derive(Debug, Clone, Copy)]
pub struct RandomNoise {
    pub seed: u64,
    pub spread: f32,
}

impl RandomNoise {
    #[inline]
    fn threshold(&self, x: usize, y: usize) -> f32 {
        let h = mix64(self.seed ^ mix64(((y as u64) << 32) ^ x as u64));
        // top 24 bits give an exact f32 in [0, 1)
        (h >> 40) as f32 / (1u64 << 24) as f32
    }
}

impl ThresholdMap for RandomNoise {
    #[inline]
    fn offset(&self, x: usize, y: usize) -> f32 {
        (self.threshold(x, y) - 0.5) * self.spread
    }
}

/// SplitMix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ranks(bayer: &Bayer) -> Vec<u32> {
        let cells = (bayer.size() * bayer.size()) as f32;
        bayer
            .thresholds
            .iter()
            .map(|t| (t * cells).round() as u32)
            .collect()
    }

    #[test]
    fn test_bayer_2x2_and_4x4() {
        assert_eq!(ranks(&Bayer::new(2, 1.0).unwrap()), vec![0, 2, 3, 1]);
        assert_eq!(
            ranks(&Bayer::new(4, 1.0).unwrap()),
            vec![0, 8, 2, 10, 12, 4, 14, 6, 3, 11, 1, 9, 15, 7, 13, 5]
        );
    }

    #[test]
    fn test_bayer_values_are_a_permutation() {
        for size in [2, 4, 8, 16, 32] {
            let mut r = ranks(&Bayer::new(size, 1.0).unwrap());
            r.sort_unstable();
            let expected: Vec<u32> = (0..(size * size) as u32).collect();
            assert_eq!(r, expected, "size {size}");
        }
    }

    #[test]
    fn test_bayer_rejects_bad_sizes() {
        for size in [0, 1, 3, 6, 12, 100, 512, 65536, usize::MAX / 2 + 1] {
            assert!(
                matches!(Bayer::new(size, 0.25), Err(QuantizeError::MatrixSize(s)) if s == size),
                "size {size} accepted"
            );
        }
    }

    #[test]
    fn test_bayer_accepts_largest_size() {
        let bayer = Bayer::new(MAX_MATRIX_SIZE, 0.25).unwrap();
        assert_eq!(bayer.size(), 256);
    }

    #[test]
    fn test_bayer_offset_law_and_tiling() {
        let bayer = Bayer::new(4, 0.5).unwrap();
        assert_eq!(bayer.offset(0, 0), -0.25);
        assert_eq!(bayer.offset(4, 8), bayer.offset(0, 0));
        assert_eq!(bayer.offset(5, 1), bayer.offset(1, 1));
        let max = (15.0 / 16.0 - 0.5) * 0.5;
        assert!((bayer.offset(0, 3) - max).abs() < 1e-7);
    }

    #[test]
    fn test_bayer_tile_mean_is_centered() {
        let bayer = Bayer::new(16, 1.0).unwrap();
        let mut sum = 0.0f64;
        for y in 0..16 {
            for x in 0..16 {
                sum += bayer.offset(x, y) as f64;
            }
        }
        // mean of (m/256 - 0.5) over m in 0..256 is -1/512
        assert!((sum / 256.0 + 1.0 / 512.0).abs() < 1e-6);
    }

    #[test]
    fn test_clustered_dot_covers_all_levels() {
        let map = ClusteredDot { spread: 1.0 };
        let mut seen: Vec<i32> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .map(|(x, y)| ((map.offset(x, y) + 0.5) * 16.0).round() as i32)
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..16).collect::<Vec<_>>());
        assert_eq!(map.offset(1, 1), -0.5);
        assert_eq!(map.offset(5, 5), map.offset(1, 1));
    }

    #[test]
    fn test_random_noise_deterministic_and_bounded() {
        let a = RandomNoise { seed: 7, spread: 0.5 };
        let b = RandomNoise { seed: 7, spread: 0.5 };
        let c = RandomNoise { seed: 8, spread: 0.5 };
        let mut differs = false;
        for y in 0..32 {
            for x in 0..32 {
                let o = a.offset(x, y);
                assert_eq!(o, b.offset(x, y));
                assert!((-0.25..0.25).contains(&o));
                differs |= o != c.offset(x, y);
            }
        }
        assert!(differs, "different seeds should give different noise");
    }

    #[test]
    fn test_random_noise_is_roughly_uniform() {
        let map = RandomNoise { seed: 0, spread: 1.0 };
        let mut below = 0;
        for y in 0..64 {
            for x in 0..64 {
                if map.offset(x, y) < 0.0 {
                    below += 1;
                }
            }
        }
        assert!((1800..2300).contains(&below), "{below} of 4096 below zero");
    }
}
