//! Pipeline entry point and the crate-wide error type.

mod builder;
mod error;

pub use builder::Quantizer;
pub use error::QuantizeError;
