//! Shared helpers for dithercard integration tests.

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Write a `width × height` test photo: red, green and blue bands over a
/// vertical brightness ramp. Returns its path.
pub fn write_photo(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let level = 80 + (y * 175 / height.max(1)) as u8;
        *pixel = match x * 3 / width {
            0 => Rgb([level, 20, 30]),
            1 => Rgb([25, level, 40]),
            _ => Rgb([30, 35, level]),
        };
    }
    let path = dir.join(name);
    img.save(&path).expect("Should write test photo");
    path
}

/// Like [`write_photo`], framed by a pure black border `border` pixels wide.
pub fn write_bordered_photo(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    border: u32,
) -> PathBuf {
    let path = write_photo(dir, name, width, height);
    let mut img = read_card(&path);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if x < border || y < border || x >= width - border || y >= height - border {
            *pixel = Rgb([0, 0, 0]);
        }
    }
    img.save(&path).expect("Should write bordered photo");
    path
}

/// Decode a written card back to RGB.
pub fn read_card(path: &Path) -> RgbImage {
    image::open(path).expect("Should decode card").to_rgb8()
}

/// Distinct colors in a decoded card.
pub fn distinct_colors(img: &RgbImage) -> std::collections::HashSet<[u8; 3]> {
    img.pixels().map(|p| p.0).collect()
}
