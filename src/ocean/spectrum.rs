//! Initial wave spectrum h0 from a Phillips energy model.

use glam::Vec2;
use rayon::prelude::*;

use super::field::{wavevector, Complex, SpectralField};
use super::noise::NoiseField;
use crate::kernels::SpectrumUniforms;

/// Wavevectors shorter than this are treated as the k = 0 bin
pub const MIN_WAVEVECTOR: f32 = 1.0e-6;

/// Phillips wave energy density at wavevector `k`
///
/// Peaks along the wind direction, decays with |k|, and is exactly zero at
/// k = 0 and under zero wind. Waves much shorter than `small_wave_ratio` times
/// the largest wind wave are suppressed.
pub fn phillips(k: Vec2, params: &SpectrumUniforms) -> f32 {
    let wind = Vec2::from_array(params.wind);
    let wind_speed = wind.length();
    let k_length = k.length();
    if k_length < MIN_WAVEVECTOR || wind_speed <= 0.0 {
        return 0.0;
    }

    // Largest wave arising from a continuous wind of this speed
    let largest = wind_speed * wind_speed / params.gravity;
    let alignment = (k / k_length).dot(wind / wind_speed);
    let k2 = k_length * k_length;
    let damping = largest * params.small_wave_ratio;

    params.amplitude * (-1.0 / (k2 * largest * largest)).exp() / (k2 * k2)
        * alignment
        * alignment
        * (-k2 * damping * damping).exp()
}

/// Fill `h0` with `(ξr + iξi) · sqrt(P(k) / 2)` for every bin
pub fn generate_initial_spectrum(
    params: &SpectrumUniforms,
    noise: &NoiseField,
    h0: &mut SpectralField,
) {
    let n = params.resolution as usize;
    debug_assert_eq!(noise.resolution(), n);
    debug_assert_eq!(h0.resolution(), n);

    h0.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(z, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let [re, im] = *noise.get(x, z);
                let k = wavevector(x, z, n, params.domain_length);
                *out = Complex::new(re, im) * (phillips(k, params) * 0.5).sqrt();
            }
        });
}
