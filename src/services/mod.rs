pub mod card_pipeline;

pub use card_pipeline::{default_output_path, CardPipeline, RunSummary};
