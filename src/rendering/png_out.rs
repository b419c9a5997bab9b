//! Indexed PNG output for paletted rasters.

use legend_dither::PalettedRaster;
use std::io::Cursor;

use crate::error::RenderError;

/// Encode `raster` as an indexed PNG (color type 3) with its palette as
/// PLTE.
///
/// The bit depth is the smallest of 1, 2, 4 or 8 that holds every index.
/// With `optimize`, the file is re-compressed with oxipng; if that fails
/// the plain encoding is returned.
pub fn encode_indexed_png(raster: &PalettedRaster<'_>, optimize: bool) -> Result<Vec<u8>, RenderError> {
    let width = u32::try_from(raster.width())
        .map_err(|_| RenderError::PngEncode(format!("width {} too large", raster.width())))?;
    let height = u32::try_from(raster.height())
        .map_err(|_| RenderError::PngEncode(format!("height {} too large", raster.height())))?;

    let palette = raster.palette();
    let (depth, bits) = bit_depth_for(palette.len());
    let plte: Vec<u8> = palette.iter().flat_map(|c| c.to_bytes()).collect();
    let packed = if bits == 8 {
        raster.indices().to_vec()
    } else {
        pack_nbits(raster.indices(), raster.width(), bits)
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(depth);
        encoder.set_palette(plte);
        // fast settings, oxipng picks filters and compression afterwards
        if optimize {
            encoder.set_compression(png::Compression::Fast);
            encoder.set_filter(png::FilterType::NoFilter);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    );
    match optimized {
        Ok(bytes) => {
            tracing::debug!(before = png_bytes.len(), after = bytes.len(), "Optimized PNG");
            Ok(bytes)
        }
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, keeping unoptimized PNG");
            Ok(png_bytes)
        }
    }
}

/// Smallest PNG bit depth that can address `colors` palette entries.
fn bit_depth_for(colors: usize) -> (png::BitDepth, u8) {
    match colors {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    }
}

/// Pack indices into 1, 2 or 4 bit rows, most significant bits first.
/// Every row starts on a byte boundary.
fn pack_nbits(indices: &[u8], width: usize, bits: u8) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width));

    for row in indices.chunks(width) {
        for group in row.chunks(pixels_per_byte) {
            let mut byte = 0u8;
            for (i, &idx) in group.iter().enumerate() {
                byte |= (idx & mask) << (8 - bits - i as u8 * bits);
            }
            packed.push(byte);
        }
    }

    packed
}
