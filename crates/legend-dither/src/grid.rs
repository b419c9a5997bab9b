//! Row-major pixel grid handed to the quantizer.

use crate::api::QuantizeError;
use crate::color::Srgb;

/// An immutable `width × height` grid of sRGB pixels in row-major order.
///
/// The grid is what the decode/resize side produces and what both the
/// palette extractor and the ditherer read. Empty grids are representable;
/// each stage decides whether it can work with one.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    pixels: Vec<Srgb>,
    width: usize,
    height: usize,
}

impl PixelGrid {
    /// Wrap pixels, checking that there is exactly one per cell.
    pub fn new(pixels: Vec<Srgb>, width: usize, height: usize) -> Result<Self, QuantizeError> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            QuantizeError::Input(format!("{width}x{height} grid is too large"))
        })?;
        if pixels.len() != expected {
            return Err(QuantizeError::Input(format!(
                "{width}x{height} grid needs {expected} pixels, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Build from packed 8-bit RGB bytes (`[r, g, b, r, g, b, ...]`).
    ///
    /// ```
    /// use legend_dither::PixelGrid;
    ///
    /// let grid = PixelGrid::from_rgb8(&[255, 0, 0, 0, 0, 255], 2, 1).unwrap();
    /// assert_eq!(grid.get(1, 0).to_bytes(), [0, 0, 255]);
    /// ```
    pub fn from_rgb8(bytes: &[u8], width: usize, height: usize) -> Result<Self, QuantizeError> {
        if bytes.len() % 3 != 0 {
            return Err(QuantizeError::Input(format!(
                "RGB buffer length {} is not a multiple of 3",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| Srgb::from_u8(p[0], p[1], p[2]))
            .collect();
        Self::new(pixels, width, height)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Srgb] {
        &self.pixels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Srgb {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// The central region spanning half of each dimension (at least one
    /// pixel when the source is non-empty).
    pub fn crop_center(&self) -> PixelGrid {
        let (x0, w) = central_half(self.width);
        let (y0, h) = central_half(self.height);
        let mut pixels = Vec::with_capacity(w * h);
        for y in y0..y0 + h {
            let row = y * self.width;
            pixels.extend_from_slice(&self.pixels[row + x0..row + x0 + w]);
        }
        PixelGrid {
            pixels,
            width: w,
            height: h,
        }
    }
}

fn central_half(len: usize) -> (usize, usize) {
    let span = (len / 2).max(len.min(1));
    ((len - span) / 2, span)
}
