//! Oklab, the perceptual space used for clustering and nearest-color search.
//!
//! Reference: Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

/// A color in Oklab.
///
/// - `l`: lightness, 0.0 (black) to 1.0 (white)
/// - `a`: green (negative) to red (positive)
/// - `b`: blue (negative) to yellow (positive)
///
/// Euclidean distance approximates perceived difference, which is why
/// k-means centroids are averaged here rather than in RGB. Values are not
/// clamped; averages of in-gamut colors may fall slightly outside sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Oklab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance. Compare these directly; the square root
    /// is never needed for ranking.
    ///
    /// ```
    /// use legend_dither::Oklab;
    /// let black = Oklab::new(0.0, 0.0, 0.0);
    /// let white = Oklab::new(1.0, 0.0, 0.0);
    /// assert!((black.distance_squared(white) - 1.0).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// HyAB distance (Abasi et al., 2020): `kl * |dL| + kc * |dab|`.
    ///
    /// Weighting lightness separately keeps greys from drifting onto
    /// saturated palette entries of similar lightness.
    #[inline]
    pub fn hyab_distance(self, other: Oklab, kl: f32, kc: f32) -> f32 {
        let da = self.a - other.a;
        let db = self.b - other.b;
        kl * (self.l - other.l).abs() + kc * (da * da + db * db).sqrt()
    }

    /// Chroma magnitude, `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }
}

impl From<LinearRgb> for Oklab {
    /// Forward transform with the 2021-01-25 matrices.
    fn from(rgb: LinearRgb) -> Self {
        let l = 0.4122214708 * rgb.r + 0.5363325363 * rgb.g + 0.0514459929 * rgb.b;
        let m = 0.2119034982 * rgb.r + 0.6806995451 * rgb.g + 0.1073969566 * rgb.b;
        let s = 0.0883024619 * rgb.r + 0.2817188376 * rgb.g + 0.6299787005 * rgb.b;

        let (l, m, s) = (l.cbrt(), m.cbrt(), s.cbrt());

        Oklab {
            l: 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
            a: 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
            b: 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
        }
    }
}

impl From<Srgb> for Oklab {
    #[inline]
    fn from(srgb: Srgb) -> Self {
        Oklab::from(LinearRgb::from(srgb))
    }
}

impl From<Oklab> for LinearRgb {
    /// Inverse transform. The result is not clamped: out-of-gamut Oklab
    /// colors produce channels outside `0.0..=1.0`.
    fn from(lab: Oklab) -> Self {
        let l = lab.l + 0.3963377774 * lab.a + 0.2158037573 * lab.b;
        let m = lab.l - 0.1055613458 * lab.a - 0.0638541728 * lab.b;
        let s = lab.l - 0.0894841775 * lab.a - 1.2914855480 * lab.b;

        let (l, m, s) = (l * l * l, m * m * m, s * s * s);

        LinearRgb {
            r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
            g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
            b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
        }
    }
}

impl From<Oklab> for Srgb {
    /// Back to display sRGB, clamping anything outside the gamut.
    #[inline]
    fn from(lab: Oklab) -> Self {
        Srgb::from(LinearRgb::from(lab).clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_matches_palette_crate() {
        use palette::{IntoColor, LinSrgb, Oklab as Reference};

        for (r, g, b) in [
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (0.5, 0.5, 0.5),
            (0.2, 0.7, 0.4),
            (1.0, 1.0, 1.0),
        ] {
            let ours = Oklab::from(LinearRgb::new(r, g, b));
            let theirs: Reference<f32> = LinSrgb::new(r, g, b).into_color();
            assert!(
                close(ours.l, theirs.l) && close(ours.a, theirs.a) && close(ours.b, theirs.b),
                "({r}, {g}, {b}): ours {ours:?}, palette ({}, {}, {})",
                theirs.l,
                theirs.a,
                theirs.b
            );
        }
    }

    #[test]
    fn test_linear_round_trip() {
        for (r, g, b) in [
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 1.0),
            (1.0, 0.0, 1.0),
            (0.25, 0.25, 0.25),
            (0.8, 0.3, 0.05),
            (0.0, 0.0, 0.0),
        ] {
            let back = LinearRgb::from(Oklab::from(LinearRgb::new(r, g, b)));
            assert!(
                close(back.r, r) && close(back.g, g) && close(back.b, b),
                "({r}, {g}, {b}) came back as {back:?}"
            );
        }
    }

    #[test]
    fn test_white_and_black_are_achromatic() {
        let white = Oklab::from(Srgb::WHITE);
        let black = Oklab::from(Srgb::BLACK);
        assert!(close(white.l, 1.0), "white L = {}", white.l);
        assert!(white.chroma() < 1e-4);
        assert!(close(black.l, 0.0));
        assert!(black.chroma() < 1e-6);
    }

    #[test]
    fn test_distances() {
        let gray = Oklab::new(0.5, 0.0, 0.0);
        let black = Oklab::new(0.0, 0.0, 0.0);
        let white = Oklab::new(1.0, 0.0, 0.0);
        assert!((gray.distance_squared(black) - gray.distance_squared(white)).abs() < 1e-6);
        assert!(white.distance_squared(white) < 1e-10);

        let red = Oklab::new(0.5, 0.1, 0.0);
        let green = Oklab::new(0.5, -0.1, 0.0);
        assert!((red.hyab_distance(green, 2.0, 1.0) - 0.2).abs() < 1e-6);
        assert!((black.hyab_distance(white, 2.0, 1.0) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_gamut_lab_clamps_to_srgb() {
        let vivid = Oklab::new(0.6, 0.4, 0.0);
        let srgb = Srgb::from(vivid);
        assert!(srgb.is_finite());
        assert!((0.0..=1.0).contains(&srgb.r));
        assert!((0.0..=1.0).contains(&srgb.g));
        assert!((0.0..=1.0).contains(&srgb.b));
    }
}
