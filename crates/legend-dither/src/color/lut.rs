//! Gamma lookup tables generated by `build.rs`.
//!
//! Both directions interpolate linearly between adjacent table entries,
//! which keeps an 8-bit round trip within one code value.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

const LAST: usize = 4095;

#[inline]
fn interpolate(table: &[f32; 4096], x: f32) -> f32 {
    let scaled = x.clamp(0.0, 1.0) * LAST as f32;
    let index = scaled as usize;
    if index >= LAST {
        return table[LAST];
    }
    let frac = scaled - index as f32;
    let lo = table[index];
    lo + (table[index + 1] - lo) * frac
}

/// Gamma-decode one sRGB channel (0.0..=1.0) into linear light.
///
/// Inputs outside 0.0..=1.0 are clamped.
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    interpolate(&SRGB_TO_LINEAR, srgb)
}

/// Gamma-encode one linear channel (0.0..=1.0) into sRGB.
///
/// Inputs outside 0.0..=1.0 are clamped, so out-of-gamut linear values
/// saturate at black or full intensity.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    interpolate(&LINEAR_TO_SRGB, linear)
}
