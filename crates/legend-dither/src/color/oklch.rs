//! Oklch, the polar form of Oklab (lightness, chroma, hue).
//!
//! This is the perceptual lightness/chroma/hue space of the pipeline:
//! `Oklch::from(Srgb)` and `Srgb::from(Oklch)` are the adapter's two
//! conversions, [`Oklch::hcl_adjust`] is the boost applied to cluster
//! centroids, and palette ordering sorts on `(c, hue, l)`.

use super::linear_rgb::LinearRgb;
use super::oklab::Oklab;
use super::srgb::Srgb;

/// Slack allowed on each linear channel before a color counts as out of
/// gamut. Absorbs f32 noise from the matrix round trip.
const GAMUT_TOLERANCE: f32 = 1e-4;

/// Coarse steps walked down from the requested chroma. The displayable
/// chroma along one hue/lightness ray is not always a single interval, so
/// the search starts from the top rather than from grey.
const CHROMA_SCAN_STEPS: u32 = 256;

/// Bisection steps that refine the coarse scan.
const CHROMA_SEARCH_STEPS: u32 = 24;

/// Independent multipliers for hue, chroma and lightness.
///
/// The default profile boosts chroma by 1.5 and leaves hue and lightness
/// untouched, which counteracts the greying that averaging pixels into a
/// centroid produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HclBoost {
    /// Multiplier on the hue angle in degrees (wrapped into `0..360`)
    pub hue: f32,
    /// Multiplier on chroma
    pub chroma: f32,
    /// Multiplier on lightness
    pub lightness: f32,
}

impl HclBoost {
    /// Leaves colors unchanged (apart from gamut clamping).
    pub const IDENTITY: HclBoost = HclBoost {
        hue: 1.0,
        chroma: 1.0,
        lightness: 1.0,
    };
}

impl Default for HclBoost {
    fn default() -> Self {
        Self {
            hue: 1.0,
            chroma: 1.5,
            lightness: 1.0,
        }
    }
}

/// A color in Oklch.
///
/// - `l`: lightness (same as Oklab L)
/// - `c`: chroma, `sqrt(a² + b²)`, 0.0 for greys
/// - `h`: hue angle in radians, `atan2(b, a)`
///
/// Hue is meaningless at zero chroma; `atan2(0, 0)` yields 0.0, which is
/// harmless because scaling zero chroma keeps it zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

impl Oklch {
    #[inline]
    pub fn new(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    /// Hue in degrees, normalized into `0.0..360.0`.
    #[inline]
    pub fn hue_degrees(self) -> f32 {
        let degrees = self.h.to_degrees().rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative angles
        if degrees >= 360.0 {
            0.0
        } else {
            degrees
        }
    }

    /// Scale chroma, keeping lightness and hue. Negative results clamp to 0.
    #[inline]
    pub fn scale_chroma(self, factor: f32) -> Self {
        Self {
            c: (self.c * factor).max(0.0),
            ..self
        }
    }

    /// True when the color converts to sRGB without clipping.
    pub fn in_gamut(self) -> bool {
        LinearRgb::from(Oklab::from(self)).in_unit_cube(GAMUT_TOLERANCE)
    }

    /// Pull the color back into the sRGB gamut.
    ///
    /// Lightness clamps to `0.0..=1.0`. Chroma that cannot be displayed at
    /// this hue and lightness is reduced to the largest chroma that can.
    /// Hue is never changed and nothing wraps or reflects.
    pub fn clamp_to_gamut(self) -> Self {
        let clamped = Self {
            l: self.l.clamp(0.0, 1.0),
            c: self.c.max(0.0),
            h: self.h,
        };
        if clamped.in_gamut() {
            return clamped;
        }

        let at = |c: f32| Self { c, ..clamped };
        let step = clamped.c / CHROMA_SCAN_STEPS as f32;
        let (mut lo, mut hi) = (0.0f32, clamped.c);
        for i in (0..CHROMA_SCAN_STEPS).rev() {
            let c = step * i as f32;
            if at(c).in_gamut() {
                lo = c;
                hi = c + step;
                break;
            }
        }

        for _ in 0..CHROMA_SEARCH_STEPS {
            let mid = 0.5 * (lo + hi);
            if at(mid).in_gamut() {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        at(lo)
    }

    /// Scale hue, chroma and lightness independently, then clamp into the
    /// displayable gamut.
    ///
    /// ```
    /// use legend_dither::{HclBoost, Oklch, Srgb};
    ///
    /// let muted = Oklch::from(Srgb::from_u8(150, 110, 100));
    /// let boosted = muted.hcl_adjust(HclBoost::default());
    /// assert!(boosted.c > muted.c);
    /// assert!(boosted.in_gamut());
    /// ```
    ///
    /// A boost never leaves a displayable color with less chroma than it
    /// started with.
    pub fn hcl_adjust(self, boost: HclBoost) -> Self {
        let hue = (self.hue_degrees() * boost.hue).rem_euclid(360.0);
        let target = Self {
            l: self.l * boost.lightness,
            c: self.c * boost.chroma,
            h: hue.to_radians(),
        };
        let clamped = target.clamp_to_gamut();

        let floor = Self {
            c: self.c.min(target.c.max(0.0)),
            ..clamped
        };
        if clamped.c < floor.c && floor.in_gamut() {
            floor
        } else {
            clamped
        }
    }
}

impl From<Oklab> for Oklch {
    fn from(lab: Oklab) -> Self {
        Self {
            l: lab.l,
            c: lab.chroma(),
            h: lab.b.atan2(lab.a),
        }
    }
}

impl From<Oklch> for Oklab {
    fn from(lch: Oklch) -> Self {
        Self::new(lch.l, lch.c * lch.h.cos(), lch.c * lch.h.sin())
    }
}

impl From<Srgb> for Oklch {
    /// The adapter's `toPerceptual`.
    #[inline]
    fn from(srgb: Srgb) -> Self {
        Oklch::from(Oklab::from(srgb))
    }
}

impl From<Oklch> for Srgb {
    /// The adapter's `toRGB`; clips anything still outside the gamut.
    #[inline]
    fn from(lch: Oklch) -> Self {
        Srgb::from(Oklab::from(lch))
    }
}
