//! Palettes: construction, parsing, matching and extraction from images.

mod error;
pub mod extract;
pub mod kmeans;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use extract::{extract, ClusteringError, ExtractOptions};
pub use palette::{DistanceMetric, Palette, MAX_COLORS};
