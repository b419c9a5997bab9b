use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dithercard::models::AppConfig;
use dithercard::services::{default_output_path, CardPipeline};
use legend_dither::{DitherAlgorithm, LegendMode};

#[derive(Parser)]
#[command(name = "dithercard")]
#[command(about = "Turn a photo into a small paletted, dithered card with a color legend")]
#[command(version)]
struct Cli {
    /// Image to convert (JPEG, PNG, WebP, GIF, BMP)
    input: PathBuf,

    /// Explicit palette such as "#FF0000#00FF00#0000FF"; skips clustering
    palette: Option<String>,

    /// Output PNG path [default: <input stem>.dither.png]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,

    /// YAML configuration file
    #[arg(short, long, env = "DITHERCARD_CONFIG")]
    config: Option<PathBuf>,

    /// Number of palette colors, reserved black/white included
    #[arg(short = 'k', long)]
    colors: Option<usize>,

    /// Always include pure black in the palette
    #[arg(long)]
    reserve_black: bool,

    /// Always include pure white in the palette
    #[arg(long)]
    reserve_white: bool,

    /// Cluster only the central half of the image
    #[arg(long)]
    crop: bool,

    /// Most pixels sampled for clustering (0 = all)
    #[arg(long)]
    sample_cap: Option<usize>,

    /// Seed for clustering and random-noise dithering
    #[arg(long)]
    seed: Option<u64>,

    /// Dithering algorithm
    #[arg(long)]
    algorithm: Option<DitherAlgorithm>,

    /// Bayer matrix size (power of two)
    #[arg(long)]
    matrix_size: Option<usize>,

    /// Threshold spread in linear intensity
    #[arg(long)]
    spread: Option<f32>,

    /// Legend sizing: "fixed" or "proportional"
    #[arg(long)]
    legend: Option<LegendMode>,

    /// Longest side of the resized image
    #[arg(long)]
    canvas_size: Option<u32>,

    /// Skip oxipng re-compression
    #[arg(long)]
    no_optimize: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(colors) = self.colors {
            config.palette.colors = colors;
        }
        config.palette.reserve_black |= self.reserve_black;
        config.palette.reserve_white |= self.reserve_white;
        config.palette.crop |= self.crop;
        if let Some(cap) = self.sample_cap {
            config.palette.sample_cap = cap;
        }
        if let Some(seed) = self.seed {
            config.palette.seed = seed;
        }
        if let Some(algorithm) = self.algorithm {
            config.dither.algorithm = algorithm;
        }
        if let Some(size) = self.matrix_size {
            config.dither.matrix_size = size;
        }
        if let Some(spread) = self.spread {
            config.dither.spread = spread;
        }
        if let Some(mode) = self.legend {
            config.legend.mode = mode;
        }
        if let Some(size) = self.canvas_size {
            config.canvas_size = size;
        }
        if self.no_optimize {
            config.output.optimize = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dithercard=info,legend_dither=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    if output.exists() && !cli.force {
        eprintln!("{} already exists.", output.display());
        return Ok(());
    }

    let config = cli.resolve_config()?;
    let pipeline = CardPipeline::new(config);
    let summary = pipeline.run(&cli.input, cli.palette.as_deref(), &output)?;

    println!("{}", summary.palette_hex.join(" "));
    Ok(())
}
