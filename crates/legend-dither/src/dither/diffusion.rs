//! Error diffusion dithering.

use super::kernel::{Kernel, ATKINSON, FLOYD_STEINBERG};
use super::{Dither, ErrorBuffer};
use crate::color::{LinearRgb, Oklab};
use crate::palette::Palette;

/// Error diffusion with a fixed kernel.
///
/// Quantization error is measured and spread in linear RGB, where light
/// adds up; matching happens in Oklab. Accumulated error is clamped per
/// channel to `[-error_clamp, 1 + error_clamp]` so small palettes do not
/// bloom. The scan is sequential, but the result is still a pure function
/// of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDiffusion {
    pub kernel: Kernel,
    /// Alternate row direction, mirroring the kernel on right-to-left rows.
    pub serpentine: bool,
    pub error_clamp: f32,
}

impl ErrorDiffusion {
    pub fn floyd_steinberg() -> Self {
        Self {
            kernel: FLOYD_STEINBERG,
            serpentine: true,
            error_clamp: 0.5,
        }
    }

    pub fn atkinson() -> Self {
        Self {
            kernel: ATKINSON,
            serpentine: true,
            error_clamp: 0.5,
        }
    }

    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    pub fn error_clamp(mut self, clamp: f32) -> Self {
        self.error_clamp = clamp;
        self
    }
}

#[inline]
fn clamp_channel(value: f32, max_error: f32) -> f32 {
    value.clamp(-max_error, 1.0 + max_error)
}

impl Dither for ErrorDiffusion {
    fn dither(
        &self,
        image: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
    ) -> Vec<u8> {
        let mut output = vec![0u8; width * height];
        let mut errors = ErrorBuffer::new(width, self.kernel.max_dy + 1);
        let divisor = self.kernel.divisor as f32;

        for y in 0..height {
            let reverse = self.serpentine && y % 2 == 1;
            for step in 0..width {
                let x = if reverse { width - 1 - step } else { step };
                let idx = y * width + x;
                let acc = errors.get_accumulated(x);
                let pixel = LinearRgb::new(
                    clamp_channel(image[idx].r + acc[0], self.error_clamp),
                    clamp_channel(image[idx].g + acc[1], self.error_clamp),
                    clamp_channel(image[idx].b + acc[2], self.error_clamp),
                );

                let (nearest, _) = palette.find_nearest(Oklab::from(pixel));
                output[idx] = nearest as u8;

                let chosen = palette.linear(nearest);
                let error = [pixel.r - chosen.r, pixel.g - chosen.g, pixel.b - chosen.b];

                for &(dx, dy, weight) in self.kernel.entries {
                    let dx = if reverse { -dx } else { dx };
                    let nx = x as i64 + dx as i64;
                    if nx < 0 || y + dy as usize >= height {
                        continue;
                    }
                    let share = weight as f32 / divisor;
                    errors.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * share, error[1] * share, error[2] * share],
                    );
                }
            }

            errors.advance_row();
        }

        output
    }
}
