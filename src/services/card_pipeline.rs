use legend_dither::{Palette, PixelGrid, Quantizer};
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::models::AppConfig;
use crate::rendering::{encode_indexed_png, load_image};

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    /// Canvas size, legend included
    pub width: usize,
    pub height: usize,
    /// Palette in legend order, as `#rrggbb`
    pub palette_hex: Vec<String>,
}

/// `photo.jpg` -> `photo.dither.png`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("dither.png")
}

/// Pipeline that turns one image file into one card:
/// decode → palette → dither → compose → encode → write
pub struct CardPipeline {
    config: AppConfig,
    quantizer: Quantizer,
}

impl CardPipeline {
    pub fn new(config: AppConfig) -> Self {
        let quantizer = config.quantizer();
        Self { config, quantizer }
    }

    /// Render `input` to `output`.
    ///
    /// With `explicit_palette` (`#RRGGBB#RRGGBB…`) clustering is skipped and
    /// the given colors are used in their literal order. Nothing is written
    /// unless every stage succeeds.
    pub fn run(
        &self,
        input: &Path,
        explicit_palette: Option<&str>,
        output: &Path,
    ) -> Result<RunSummary, RenderError> {
        // Explicit palette errors surface before any decoding
        let explicit = explicit_palette
            .map(|text| self.quantizer.parse_palette(text))
            .transpose()?;

        let grid = load_image(input, self.config.canvas_size)?;

        let palette = match explicit {
            Some(palette) => palette,
            None => self.extract(&grid)?,
        };
        tracing::debug!(colors = palette.len(), palette = %palette, "Palette ready");

        let canvas = self.quantizer.render(&grid, &palette)?;
        let png_bytes = encode_indexed_png(&canvas, self.config.output.optimize)?;
        std::fs::write(output, &png_bytes)?;

        tracing::info!(
            output = %output.display(),
            width = canvas.width(),
            height = canvas.height(),
            bytes = png_bytes.len(),
            "Wrote card"
        );

        Ok(RunSummary {
            output: output.to_path_buf(),
            width: canvas.width(),
            height: canvas.height(),
            palette_hex: palette.hex_colors(),
        })
    }

    fn extract(&self, grid: &PixelGrid) -> Result<Palette, RenderError> {
        let palette = self.quantizer.extract_palette(grid)?;
        let requested = self.config.palette.colors;
        if palette.len() < requested {
            tracing::info!(
                requested,
                extracted = palette.len(),
                "Image has fewer distinct colors than requested"
            );
        }
        Ok(palette)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
