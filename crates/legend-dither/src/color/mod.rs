//! Color types and conversions
//!
//! Four spaces, each with one job:
//!
//! - **Srgb**: gamma-encoded input pixels and palette entries
//! - **LinearRgb**: light-proportional values where dither offsets and
//!   diffused error are added
//! - **Oklab**: perceptual distance for clustering and nearest-color search
//! - **Oklch**: polar Oklab for chroma boosting and palette ordering
//!
//! # Example
//!
//! ```
//! use legend_dither::{HclBoost, Oklch, Srgb};
//!
//! let pixel = Srgb::from_u8(200, 80, 40);
//! let perceptual = Oklch::from(pixel);
//! let boosted = Srgb::from(perceptual.hcl_adjust(HclBoost::default()));
//! assert!(boosted.is_finite());
//! ```

mod linear_rgb;
mod lut;
mod oklab;
mod oklch;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use oklch::{HclBoost, Oklch};
pub use srgb::Srgb;
