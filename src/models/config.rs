use legend_dither::{
    DistanceMetric, DitherAlgorithm, DitherOptions, ExtractOptions, HclBoost, LegendMode,
    Quantizer, MAX_MATRIX_SIZE,
};
use serde::Deserialize;
use std::path::Path;

use crate::error::RenderError;

/// Bounding box the decoded image is shrunk to fit.
pub const DEFAULT_CANVAS_SIZE: u32 = 512;

/// Application configuration loaded from a YAML file.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Longest side of the resized source image, in pixels
    pub canvas_size: u32,

    pub palette: PaletteConfig,

    pub dither: DitherConfig,

    pub legend: LegendConfig,

    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            palette: PaletteConfig::default(),
            dither: DitherConfig::default(),
            legend: LegendConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Palette extraction settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    /// Number of palette colors, reserved ones included
    pub colors: usize,
    pub reserve_black: bool,
    pub reserve_white: bool,
    /// Cluster only the central half of the image
    pub crop: bool,
    /// Most pixels fed to clustering (0 = all)
    pub sample_cap: usize,
    pub seed: u64,
    pub max_iterations: usize,
    pub boost: BoostConfig,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let defaults = ExtractOptions::default();
        Self {
            colors: defaults.k,
            reserve_black: defaults.reserve_black,
            reserve_white: defaults.reserve_white,
            crop: defaults.crop,
            sample_cap: defaults.sample_cap,
            seed: defaults.seed,
            max_iterations: defaults.max_iterations,
            boost: BoostConfig::default(),
        }
    }
}

impl PaletteConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            k: self.colors,
            reserve_black: self.reserve_black,
            reserve_white: self.reserve_white,
            crop: self.crop,
            sample_cap: self.sample_cap,
            seed: self.seed,
            boost: self.boost.into(),
            max_iterations: self.max_iterations,
        }
    }
}

/// Multipliers applied to each cluster centroid in Oklch
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BoostConfig {
    pub hue: f32,
    pub chroma: f32,
    pub lightness: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        HclBoost::default().into()
    }
}

impl From<HclBoost> for BoostConfig {
    fn from(boost: HclBoost) -> Self {
        Self {
            hue: boost.hue,
            chroma: boost.chroma,
            lightness: boost.lightness,
        }
    }
}

impl From<BoostConfig> for HclBoost {
    fn from(boost: BoostConfig) -> Self {
        HclBoost {
            hue: boost.hue,
            chroma: boost.chroma,
            lightness: boost.lightness,
        }
    }
}

/// Color distance used to match pixels to palette entries
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    #[default]
    Euclidean,
    Hyab,
}

/// Dithering settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DitherConfig {
    pub algorithm: DitherAlgorithm,
    /// Bayer matrix side, a power of two
    pub matrix_size: usize,
    pub spread: f32,
    pub metric: MetricKind,
    /// Lightness weight for the HyAB metric
    pub hyab_kl: f32,
    /// Chroma weight for the HyAB metric
    pub hyab_kc: f32,
    pub serpentine: bool,
    pub error_clamp: f32,
}

impl Default for DitherConfig {
    fn default() -> Self {
        let defaults = DitherOptions::default();
        Self {
            algorithm: defaults.algorithm,
            matrix_size: defaults.matrix_size,
            spread: defaults.spread,
            metric: MetricKind::default(),
            hyab_kl: 2.0,
            hyab_kc: 1.0,
            serpentine: defaults.serpentine,
            error_clamp: defaults.error_clamp,
        }
    }
}

impl DitherConfig {
    pub fn dither_options(&self, seed: u64) -> DitherOptions {
        DitherOptions::new()
            .algorithm(self.algorithm)
            .matrix_size(self.matrix_size)
            .spread(self.spread)
            .seed(seed)
            .serpentine(self.serpentine)
            .error_clamp(self.error_clamp)
    }

    pub fn distance_metric(&self) -> DistanceMetric {
        match self.metric {
            MetricKind::Euclidean => DistanceMetric::Euclidean,
            MetricKind::Hyab => DistanceMetric::HyAB {
                kl: self.hyab_kl,
                kc: self.hyab_kc,
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct LegendConfig {
    pub mode: LegendMode,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Re-compress the PNG with oxipng
    pub optimize: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { optimize: true }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, RenderError> {
        // serde_yaml reads an empty document as null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file. Read and parse failures are
    /// errors, never a silent fallback to defaults.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content).map_err(|e| match e {
            RenderError::Config(msg) => RenderError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            colors = config.palette.colors,
            algorithm = %config.dither.algorithm,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reject values no stage could work with.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.canvas_size == 0 {
            return Err(RenderError::Config("canvas_size must be positive".into()));
        }
        if self.palette.colors == 0 {
            return Err(RenderError::Config("palette.colors must be at least 1".into()));
        }
        if self.dither.algorithm == DitherAlgorithm::Bayer {
            let size = self.dither.matrix_size;
            if !(2..=MAX_MATRIX_SIZE).contains(&size) || !size.is_power_of_two() {
                return Err(RenderError::Config(format!(
                    "dither.matrix_size must be a power of two between 2 and {MAX_MATRIX_SIZE}, got {size}"
                )));
            }
        }

        let boost = &self.palette.boost;
        for (name, value) in [
            ("palette.boost.hue", boost.hue),
            ("palette.boost.chroma", boost.chroma),
            ("palette.boost.lightness", boost.lightness),
            ("dither.spread", self.dither.spread),
            ("dither.hyab_kl", self.dither.hyab_kl),
            ("dither.hyab_kc", self.dither.hyab_kc),
            ("dither.error_clamp", self.dither.error_clamp),
        ] {
            if !value.is_finite() {
                return Err(RenderError::Config(format!("{name} must be a finite number, got {value}")));
            }
        }
        Ok(())
    }

    /// Quantizer configured from this file.
    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new()
            .with_extract_options(self.palette.extract_options())
            .with_dither_options(self.dither.dither_options(self.palette.seed))
            .metric(self.dither.distance_metric())
            .legend(self.legend.mode)
    }
}
