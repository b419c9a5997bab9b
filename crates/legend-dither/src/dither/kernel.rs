//! Error diffusion kernels.

/// How quantization error spreads to unprocessed neighbors.
///
/// Each entry is `(dx, dy, weight)`; a neighbor receives
/// `error * weight / divisor`. `dx` is mirrored on right-to-left rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
    /// Rows reached below the current one. The error buffer holds
    /// `max_dy + 1` rows.
    pub max_dy: usize,
}

/// Floyd-Steinberg, 100% propagation.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// Atkinson, 75% propagation (6/8). The lost quarter keeps small palettes
/// from bleeding.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
    max_dy: 2,
};
