//! Paletted output rasters and canvas composition.

pub mod legend;
mod paletted_raster;

pub use legend::{compose, CanvasLayout, LegendBlock, LegendMode, Orientation, Rect};
pub use paletted_raster::{PalettedRaster, UsageStatistics};
