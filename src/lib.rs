//! Dithercard
//!
//! Turns a photo into a small paletted, dithered image with a legend strip
//! of the colors it uses. The quantization itself lives in the
//! `legend-dither` crate; this library holds configuration, image I/O and
//! the run orchestration, and is exposed for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
