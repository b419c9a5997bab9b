//! Ordered dithering over any [`ThresholdMap`].

use super::threshold::ThresholdMap;
use super::Dither;
use crate::color::{LinearRgb, Oklab};
use crate::palette::Palette;

/// Ordered dithering: offset each pixel by its threshold, then take the
/// nearest palette entry.
///
/// The offset is added to all three linear channels, so it shifts
/// intensity without shifting hue. Matching happens in Oklab. Each pixel is
/// decided on its own, so the result is a pure function of the image, the
/// palette and the map.
///
/// # Example
///
/// ```
/// use legend_dither::dither::{Bayer, Dither, OrderedDither};
/// use legend_dither::{LinearRgb, Palette};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let ordered = OrderedDither::new(Bayer::new(4, 1.0).unwrap());
/// let indices = ordered.dither(&[LinearRgb::new(0.5, 0.5, 0.5); 16], 4, 4, &palette);
/// assert!(indices.contains(&0) && indices.contains(&1));
/// ```
#[derive(Debug, Clone)]
pub struct OrderedDither<M> {
    map: M,
}

impl<M: ThresholdMap> OrderedDither<M> {
    pub fn new(map: M) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}

impl<M: ThresholdMap> Dither for OrderedDither<M> {
    fn dither(
        &self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
    ) -> Vec<u8> {
        debug_assert_eq!(image.len(), width * height);
        let mut output = Vec::with_capacity(image.len());
        for y in 0..height {
            for (x, &pixel) in image[y * width..(y + 1) * width].iter().enumerate() {
                let perturbed = pixel.offset(self.map.offset(x, y));
                let (idx, _) = palette.find_nearest(Oklab::from(perturbed));
                output.push(idx as u8);
            }
        }
        output
    }
}
