//! Unified error type for the quantization pipeline.

use thiserror::Error;

use crate::palette::{ClusteringError, PaletteError};

/// Every way a pipeline stage can fail.
///
/// All failures are fatal and returned as soon as they happen; no stage
/// retries or produces partial output.
///
/// # Example
///
/// ```
/// use legend_dither::{Palette, QuantizeError};
///
/// fn explicit(text: &str) -> Result<Palette, QuantizeError> {
///     Ok(Palette::parse(text)?)
/// }
///
/// assert!(matches!(explicit("#12345"), Err(QuantizeError::PaletteParse(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantizeError {
    /// Malformed pixel data or dimensions
    #[error("invalid input image: {0}")]
    Input(String),
    /// Palette extraction could not run
    #[error("clustering failed: {0}")]
    Clustering(#[from] ClusteringError),
    /// A cluster centroid had no finite RGB representation
    #[error("centroid {index} could not be converted to RGB")]
    ColorConversion { index: usize },
    /// Dithering was asked to use a palette with no entries
    #[error("palette is empty")]
    EmptyPalette,
    /// Canvas composition was given unusable geometry or inputs
    #[error("layout error: {0}")]
    Layout(String),
    /// An explicit palette was rejected
    #[error("invalid palette: {0}")]
    PaletteParse(#[from] PaletteError),
    /// Bayer matrix size is not a power of two in `2..=MAX_MATRIX_SIZE`
    #[error(
        "dither matrix size {0} must be a power of two between 2 and {max}",
        max = crate::dither::MAX_MATRIX_SIZE
    )]
    MatrixSize(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use std::error::Error as _;

    #[test]
    fn test_palette_errors_convert() {
        let err: QuantizeError = Palette::parse("").unwrap_err().into();
        assert_eq!(err, QuantizeError::PaletteParse(PaletteError::EmptyPalette));
        assert!(err.to_string().starts_with("invalid palette"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_clustering_errors_convert() {
        let err = QuantizeError::from(ClusteringError::NoUsablePixels);
        assert_eq!(err.to_string(), "clustering failed: image has no usable pixels");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            QuantizeError::MatrixSize(6).to_string(),
            "dither matrix size 6 must be a power of two between 2 and 256"
        );
        assert_eq!(
            QuantizeError::ColorConversion { index: 2 }.to_string(),
            "centroid 2 could not be converted to RGB"
        );
    }
}
