//! Source image loading: decode, orient, shrink to the canvas box.

use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use legend_dither::PixelGrid;
use std::path::Path;

use crate::error::RenderError;

/// Decode the image at `path` and prepare it for quantization.
///
/// EXIF orientation is applied, the image is shrunk with Lanczos3 to fit a
/// `canvas_size × canvas_size` box (never enlarged) and alpha is dropped.
pub fn load_image(path: &Path, canvas_size: u32) -> Result<PixelGrid, RenderError> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    tracing::info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Decoded image"
    );
    to_grid(&fit_within(img, canvas_size))
}

/// Shrink `img` to fit a `max_side × max_side` box, keeping its aspect.
pub fn fit_within(img: DynamicImage, max_side: u32) -> DynamicImage {
    if img.width() <= max_side && img.height() <= max_side {
        return img;
    }
    let resized = img.resize(max_side, max_side, FilterType::Lanczos3);
    tracing::debug!(
        width = resized.width(),
        height = resized.height(),
        "Resized image"
    );
    resized
}

/// Convert to an 8-bit RGB pixel grid.
pub fn to_grid(img: &DynamicImage) -> Result<PixelGrid, RenderError> {
    let rgb = img.to_rgb8();
    let grid = PixelGrid::from_rgb8(rgb.as_raw(), rgb.width() as usize, rgb.height() as usize)?;
    Ok(grid)
}
