use legend_dither::QuantizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Quantize error: {0}")]
    Quantize(#[from] QuantizeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use legend_dither::PaletteError;

    #[test]
    fn test_render_error_png_encode() {
        let error = RenderError::PngEncode("Encoding failed".to_string());
        assert_eq!(error.to_string(), "PNG encode error: Encoding failed");
    }

    #[test]
    fn test_render_error_config() {
        let error = RenderError::Config("canvas_size must be positive".to_string());
        assert_eq!(error.to_string(), "Config error: canvas_size must be positive");
    }

    #[test]
    fn test_render_error_from_quantize_error() {
        let error: RenderError = QuantizeError::PaletteParse(PaletteError::EmptyPalette).into();
        match &error {
            RenderError::Quantize(QuantizeError::PaletteParse(_)) => {}
            other => panic!("Expected Quantize variant, got {other:?}"),
        }
        assert_eq!(
            error.to_string(),
            "Quantize error: invalid palette: palette cannot be empty"
        );
    }

    #[test]
    fn test_render_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.jpg");
        let error: RenderError = io.into();
        assert_eq!(error.to_string(), "IO error: missing.jpg");
    }
}
