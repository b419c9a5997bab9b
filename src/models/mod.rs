pub mod config;

pub use config::{
    AppConfig, BoostConfig, DitherConfig, LegendConfig, MetricKind, OutputConfig, PaletteConfig,
    DEFAULT_CANVAS_SIZE,
};
