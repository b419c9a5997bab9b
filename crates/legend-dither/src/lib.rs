// Generated LUT tables and index-heavy pixel loops.
#![allow(
    clippy::excessive_precision,
    clippy::needless_range_loop,
    clippy::module_inception
)]

//! legend-dither: palette extraction, ordered dithering and legend strips
//!
//! Turns a photo into a small paletted image plus a strip of swatches
//! showing the palette it was drawn with. Three stages, each usable alone:
//!
//! 1. [`extract`] clusters the image in Oklab and returns an ordered
//!    [`Palette`] (boosted, gamut-clamped, optionally with black/white
//!    reserved, sorted by chroma, hue and lightness).
//! 2. [`dither`] maps every pixel onto that palette with the strategy
//!    chosen in [`DitherOptions`], giving a [`PalettedRaster`].
//! 3. [`compose`] appends the legend strip, sized per [`LegendMode`].
//!
//! [`Quantizer`] runs the stages with one set of options.
//!
//! # Quick Start
//!
//! ```
//! use legend_dither::{PixelGrid, Quantizer, Srgb};
//!
//! let pixels = vec![
//!     Srgb::from_u8(255, 0, 0),
//!     Srgb::from_u8(255, 0, 0),
//!     Srgb::from_u8(0, 255, 0),
//!     Srgb::from_u8(0, 0, 255),
//! ];
//! let grid = PixelGrid::new(pixels, 2, 2).unwrap();
//!
//! let quantizer = Quantizer::new().colors(3);
//! let palette = quantizer.extract_palette(&grid).unwrap();
//! let canvas = quantizer.render(&grid, &palette).unwrap();
//!
//! assert_eq!(palette.len(), 3);
//! assert_eq!((canvas.width(), canvas.height()), (4, 2));
//! ```
//!
//! # Explicit Palettes
//!
//! A palette string such as `#FF0000#00FF00#0000FF` skips clustering and
//! keeps its literal order:
//!
//! ```
//! use legend_dither::Palette;
//!
//! let palette = Palette::parse("#FF0000#00FF00#0000FF").unwrap();
//! assert_eq!(palette.to_hex_string(), "#ff0000#00ff00#0000ff");
//! ```
//!
//! # Color Spaces
//!
//! | Space | Used for |
//! |-------|----------|
//! | [`Srgb`] | input pixels, palette entries, output |
//! | [`LinearRgb`] | threshold offsets, error diffusion |
//! | [`Oklab`] | clustering, nearest-color matching |
//! | [`Oklch`] | chroma/hue/lightness boost, gamut clamp, palette order |
//!
//! Ordered dithering adds its threshold offset to all three linear
//! channels, which moves intensity without moving hue, and then matches in
//! Oklab where distance tracks perceived difference.
//!
//! # Determinism
//!
//! Every stage is a pure function of its inputs and options. Clustering is
//! seeded ([`ExtractOptions::seed`]), random-noise thresholds are a hash of
//! seed and position, and ties between equidistant palette entries always
//! go to the lowest index.

pub mod api;
pub mod color;
pub mod dither;
pub mod grid;
pub mod output;
pub mod palette;


pub use api::{QuantizeError, Quantizer};
pub use color::{HclBoost, LinearRgb, Oklab, Oklch, Srgb};
pub use dither::{dither, DitherAlgorithm, DitherOptions, MAX_MATRIX_SIZE};
pub use grid::PixelGrid;
pub use output::{compose, CanvasLayout, LegendMode, PalettedRaster, UsageStatistics};
pub use palette::{
    extract, ClusteringError, DistanceMetric, ExtractOptions, Palette, PaletteError,
    ParseColorError,
};
