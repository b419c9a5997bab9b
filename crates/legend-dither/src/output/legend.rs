//! Canvas layout and the palette legend strip.
//!
//! The canvas is the dithered image with a square legend strip appended on
//! one side: below the image when it is landscape (`width > height`), to
//! the right otherwise. The strip is as thick as the image's long side and
//! is cut into one block per palette entry, in palette order, along its
//! long axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{PalettedRaster, UsageStatistics};
use crate::api::QuantizeError;
use crate::palette::Palette;

/// How legend blocks are sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendMode {
    /// Equal blocks, one per palette entry.
    #[default]
    Fixed,
    /// Blocks sized by each entry's share of the dithered pixels.
    Proportional,
}

impl LegendMode {
    pub fn name(self) -> &'static str {
        match self {
            LegendMode::Fixed => "fixed",
            LegendMode::Proportional => "proportional",
        }
    }
}

impl fmt::Display for LegendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LegendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "fixed-width" => Ok(LegendMode::Fixed),
            "proportional" => Ok(LegendMode::Proportional),
            _ => Err(format!(
                "unknown legend mode '{s}' (expected 'fixed' or 'proportional')"
            )),
        }
    }
}

/// Which side the strip goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Strip below the image, blocks run left to right.
    Landscape,
    /// Strip right of the image, blocks run top to bottom.
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// One legend swatch: a palette index and the canvas area it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendBlock {
    pub index: usize,
    /// Length along the strip before clipping, trailing padding included
    pub span: usize,
    /// Area actually painted, clipped to the strip
    pub rect: Rect,
}

/// Geometry of the final canvas for a given source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasLayout {
    pub orientation: Orientation,
    pub width: usize,
    pub height: usize,
    pub image: Rect,
    pub strip: Rect,
}

impl CanvasLayout {
    /// Lay out a `width × height` image plus its legend strip.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::Layout`] if either dimension is zero or the canvas
    /// size overflows.
    ///
    /// # Example
    ///
    /// ```
    /// use legend_dither::output::{CanvasLayout, Orientation};
    ///
    /// let layout = CanvasLayout::new(100, 50).unwrap();
    /// assert_eq!(layout.orientation, Orientation::Landscape);
    /// assert_eq!((layout.width, layout.height), (100, 150));
    /// ```
    pub fn new(width: usize, height: usize) -> Result<Self, QuantizeError> {
        if width == 0 || height == 0 {
            return Err(QuantizeError::Layout(format!(
                "source dimensions must be positive, got {width}x{height}"
            )));
        }
        let too_large = || QuantizeError::Layout(format!("canvas for {width}x{height} is too large"));
        let image = Rect {
            x: 0,
            y: 0,
            width,
            height,
        };

        let layout = if width > height {
            CanvasLayout {
                orientation: Orientation::Landscape,
                width,
                height: height.checked_add(width).ok_or_else(too_large)?,
                image,
                strip: Rect {
                    x: 0,
                    y: height,
                    width,
                    height: width,
                },
            }
        } else {
            CanvasLayout {
                orientation: Orientation::Portrait,
                width: width.checked_add(height).ok_or_else(too_large)?,
                height,
                image,
                strip: Rect {
                    x: width,
                    y: 0,
                    width: height,
                    height,
                },
            }
        };
        layout
            .width
            .checked_mul(layout.height)
            .ok_or_else(too_large)?;
        Ok(layout)
    }

    /// Extent of the strip along which blocks are laid out.
    pub fn strip_length(&self) -> usize {
        match self.orientation {
            Orientation::Landscape => self.strip.width,
            Orientation::Portrait => self.strip.height,
        }
    }

    /// Cut the strip into one block per entry of `usage`.
    ///
    /// Blocks are consecutive in palette order. Each block gets
    /// `floor(L / n)` units in fixed mode or `floor(count * L / total)` in
    /// proportional mode, and the last one is lengthened by `n` so rounding
    /// never leaves a gap. `span` keeps that unclipped length while `rect`
    /// is clipped to the strip, so the overdraw never reaches past the
    /// canvas. Proportional
    /// mode with no pixels at all falls back to fixed sizing.
    pub fn legend_blocks(&self, usage: &UsageStatistics, mode: LegendMode) -> Vec<LegendBlock> {
        let n = usage.counts().len();
        let length = self.strip_length();
        let total = usage.total();
        let mode = match (mode, total) {
            (LegendMode::Proportional, 0) => LegendMode::Fixed,
            (mode, _) => mode,
        };

        let mut blocks = Vec::with_capacity(n);
        let mut offset = 0usize;
        for (index, &count) in usage.counts().iter().enumerate() {
            let mut span = match mode {
                LegendMode::Fixed => length / n,
                LegendMode::Proportional => {
                    (count as u128 * length as u128 / total as u128) as usize
                }
            };
            if index + 1 == n {
                span += n;
            }

            let start = offset.min(length);
            let end = offset.saturating_add(span).min(length);
            blocks.push(LegendBlock {
                index,
                span,
                rect: self.strip_rect(start, end - start),
            });
            offset = offset.saturating_add(span);
        }
        blocks
    }

    fn strip_rect(&self, start: usize, span: usize) -> Rect {
        match self.orientation {
            Orientation::Landscape => Rect {
                x: self.strip.x + start,
                y: self.strip.y,
                width: span,
                height: self.strip.height,
            },
            Orientation::Portrait => Rect {
                x: self.strip.x,
                y: self.strip.y + start,
                width: self.strip.width,
                height: span,
            },
        }
    }
}

/// Build the final canvas: the dithered image plus its legend strip.
///
/// `raster` must be the `source_width × source_height` dithering of an
/// image against `palette`. Legend blocks are flood-filled with their
/// palette index and overwrite whatever was there; proportional sizes come
/// from the usage of `raster` itself.
///
/// # Errors
///
/// [`QuantizeError::Layout`] when the palette is empty, a source dimension
/// is zero, or `raster` does not match the given size or palette.
///
/// # Example
///
/// ```
/// use legend_dither::{compose, LegendMode, Palette, PalettedRaster};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let raster = PalettedRaster::filled(4, 2, 0, &palette);
/// let canvas = compose(&raster, &palette, 4, 2, LegendMode::Fixed).unwrap();
///
/// assert_eq!((canvas.width(), canvas.height()), (4, 6));
/// assert_eq!(canvas.get(3, 5), 1);
/// ```
pub fn compose<'p>(
    raster: &PalettedRaster<'_>,
    palette: &'p Palette,
    source_width: usize,
    source_height: usize,
    mode: LegendMode,
) -> Result<PalettedRaster<'p>, QuantizeError> {
    if palette.is_empty() {
        return Err(QuantizeError::Layout("palette is empty".into()));
    }
    let layout = CanvasLayout::new(source_width, source_height)?;
    if (raster.width(), raster.height()) != (source_width, source_height) {
        return Err(QuantizeError::Layout(format!(
            "raster is {}x{} but source is {source_width}x{source_height}",
            raster.width(),
            raster.height()
        )));
    }
    if !std::ptr::eq(raster.palette(), palette) && raster.palette().colors() != palette.colors() {
        return Err(QuantizeError::Layout(
            "raster was dithered against a different palette".into(),
        ));
    }

    let mut canvas = PalettedRaster::filled(layout.width, layout.height, 0, palette);
    canvas.blit(raster, layout.image.x, layout.image.y);

    let usage = raster.usage();
    let blocks = layout.legend_blocks(&usage, mode);
    for block in &blocks {
        let Rect {
            x,
            y,
            width,
            height,
        } = block.rect;
        canvas.fill_rect(x, y, width, height, block.index as u8);
    }

    tracing::debug!(
        width = layout.width,
        height = layout.height,
        orientation = ?layout.orientation,
        mode = %mode,
        blocks = blocks.len(),
        "Composed canvas"
    );
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn five() -> Palette {
        Palette::from_hex(&["#000000", "#ff0000", "#00ff00", "#0000ff", "#ffffff"]).unwrap()
    }

    fn widths(blocks: &[LegendBlock]) -> Vec<usize> {
        blocks.iter().map(|b| b.rect.width).collect()
    }

    #[test]
    fn test_landscape_layout() {
        let layout = CanvasLayout::new(100, 50).unwrap();
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert_eq!((layout.width, layout.height), (100, 150));
        assert_eq!(
            layout.strip,
            Rect {
                x: 0,
                y: 50,
                width: 100,
                height: 100
            }
        );
        assert_eq!(layout.strip_length(), 100);
    }

    #[test]
    fn test_square_is_portrait() {
        let layout = CanvasLayout::new(40, 40).unwrap();
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert_eq!((layout.width, layout.height), (80, 40));
        assert_eq!(layout.strip.x, 40);
    }

    #[test]
    fn test_portrait_layout() {
        let layout = CanvasLayout::new(30, 60).unwrap();
        assert_eq!((layout.width, layout.height), (90, 60));
        assert_eq!(layout.strip_length(), 60);
    }

    #[test]
    fn test_zero_dimension_is_layout_error() {
        assert!(matches!(CanvasLayout::new(0, 10), Err(QuantizeError::Layout(_))));
        assert!(matches!(CanvasLayout::new(10, 0), Err(QuantizeError::Layout(_))));
    }

    #[test]
    fn test_fixed_blocks_pad_the_last_one() {
        let palette = five();
        let raster = PalettedRaster::filled(100, 50, 0, &palette);
        let layout = CanvasLayout::new(100, 50).unwrap();
        let blocks = layout.legend_blocks(&raster.usage(), LegendMode::Fixed);
        // the fifth block is 20 + 5 long, clipped at the strip edge
        let spans: Vec<usize> = blocks.iter().map(|b| b.span).collect();
        assert_eq!(spans, vec![20, 20, 20, 20, 25]);
        assert_eq!(widths(&blocks), vec![20, 20, 20, 20, 20]);
        assert_eq!(blocks[4].rect.x, 80);
        assert!(blocks.iter().all(|b| b.rect.height == 100 && b.rect.y == 50));
    }

    #[test]
    fn test_fixed_blocks_with_remainder() {
        let palette = Palette::from_hex(&["#000000", "#ff0000", "#ffffff"]).unwrap();
        let raster = PalettedRaster::filled(10, 4, 0, &palette);
        let layout = CanvasLayout::new(10, 4).unwrap();
        let blocks = layout.legend_blocks(&raster.usage(), LegendMode::Fixed);
        // 10 / 3 = 3, so the last block needs the padding to reach x = 10
        assert_eq!(widths(&blocks), vec![3, 3, 4]);
    }

    #[test]
    fn test_proportional_blocks_follow_usage() {
        let palette = Palette::from_hex(&["#000000", "#ff0000", "#ffffff"]).unwrap();
        // 8 pixels: 6 black, 0 red, 2 white
        let raster = PalettedRaster::new(vec![0, 0, 0, 0, 0, 0, 2, 2], 4, 2, &palette);
        let layout = CanvasLayout::new(4, 2).unwrap();
        let blocks = layout.legend_blocks(&raster.usage(), LegendMode::Proportional);
        assert_eq!(widths(&blocks), vec![3, 0, 1]);
        assert_eq!(blocks[2].rect.x, 3);
    }

    #[test]
    fn test_portrait_blocks_run_down() {
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        let raster = PalettedRaster::filled(3, 7, 1, &palette);
        let layout = CanvasLayout::new(3, 7).unwrap();
        let blocks = layout.legend_blocks(&raster.usage(), LegendMode::Fixed);
        let heights: Vec<usize> = blocks.iter().map(|b| b.rect.height).collect();
        assert_eq!(heights, vec![3, 4]);
        assert_eq!((blocks[1].rect.x, blocks[1].rect.y), (3, 3));
        assert!(blocks.iter().all(|b| b.rect.width == 7));
    }

    #[test]
    fn test_more_colors_than_strip_units() {
        let colors: Vec<String> = (0..6).map(|i| format!("#{:02x}0000", i * 40)).collect();
        let refs: Vec<&str> = colors.iter().map(String::as_str).collect();
        let palette = Palette::from_hex(&refs).unwrap();
        let raster = PalettedRaster::filled(4, 1, 0, &palette);
        let layout = CanvasLayout::new(4, 1).unwrap();
        let blocks = layout.legend_blocks(&raster.usage(), LegendMode::Fixed);
        assert_eq!(widths(&blocks), vec![0, 0, 0, 0, 0, 4]);
    }

    #[test]
    fn test_compose_fills_strip() {
        let palette = five();
        let image: Vec<u8> = (0..100 * 50).map(|i| (i % 3) as u8).collect();
        let raster = PalettedRaster::new(image, 100, 50, &palette);
        for mode in [LegendMode::Fixed, LegendMode::Proportional] {
            let canvas = compose(&raster, &palette, 100, 50, mode).unwrap();
            assert_eq!((canvas.width(), canvas.height()), (100, 150));
            for y in 0..50 {
                for x in 0..100 {
                    assert_eq!(canvas.get(x, y), raster.get(x, y));
                }
            }
            // unused entries 3 and 4 still get the padded tail in proportional mode
            assert_eq!(canvas.get(99, 149), 4, "{mode}");
        }
    }

    #[test]
    fn test_compose_fixed_block_boundaries() {
        let palette = five();
        let raster = PalettedRaster::filled(100, 50, 0, &palette);
        let canvas = compose(&raster, &palette, 100, 50, LegendMode::Fixed).unwrap();
        for (x, expected) in [(0, 0), (19, 0), (20, 1), (59, 2), (60, 3), (80, 4), (99, 4)] {
            assert_eq!(canvas.get(x, 50), expected, "x = {x}");
            assert_eq!(canvas.get(x, 149), expected, "x = {x}");
        }
    }

    #[test]
    fn test_compose_rejects_mismatched_inputs() {
        let palette = five();
        let raster = PalettedRaster::filled(10, 5, 0, &palette);
        assert!(matches!(
            compose(&raster, &palette, 5, 10, LegendMode::Fixed),
            Err(QuantizeError::Layout(_))
        ));
        let other = Palette::from_hex(&["#123456"]).unwrap();
        assert!(matches!(
            compose(&raster, &other, 10, 5, LegendMode::Fixed),
            Err(QuantizeError::Layout(_))
        ));
        let empty = Palette::from_distinct(Vec::new());
        assert!(matches!(
            compose(&raster, &empty, 10, 5, LegendMode::Fixed),
            Err(QuantizeError::Layout(_))
        ));
    }

    #[test]
    fn test_compose_accepts_equal_palette_copy() {
        let palette = five();
        let copy = palette.clone();
        let raster = PalettedRaster::filled(2, 2, 3, &palette);
        let canvas = compose(&raster, &copy, 2, 2, LegendMode::Proportional).unwrap();
        assert!(std::ptr::eq(canvas.palette(), &copy));
    }

    #[test]
    fn test_legend_mode_parsing() {
        assert_eq!("Proportional".parse::<LegendMode>(), Ok(LegendMode::Proportional));
        assert_eq!("fixed-width".parse::<LegendMode>(), Ok(LegendMode::Fixed));
        assert!("equal".parse::<LegendMode>().is_err());
        assert_eq!(LegendMode::default().to_string(), "fixed");
    }
}
