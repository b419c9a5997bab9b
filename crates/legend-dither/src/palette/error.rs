//! Error types for color parsing and palette validation.

use std::num::ParseIntError;

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error returned when a palette cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No colors provided
    #[error("palette cannot be empty")]
    EmptyPalette,
    /// More entries than an 8-bit index can address
    #[error("palette has {count} colors, at most {max} are supported", max = super::MAX_COLORS)]
    TooManyColors { count: usize },
    /// The same 8-bit color appears twice
    #[error("duplicate color found at index {index}")]
    DuplicateColor {
        /// Index of the second occurrence
        index: usize,
    },
    /// One entry of an explicit palette is not a valid hex color
    #[error("invalid color {text:?} at index {index}: {source}")]
    ParseColor {
        index: usize,
        text: String,
        #[source]
        source: ParseColorError,
    },
}
