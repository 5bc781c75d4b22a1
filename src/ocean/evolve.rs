//! Time evolution of the initial spectrum into three displacement spectra.

use rayon::prelude::*;

use super::field::{mirrored, wavevector, Complex, SpectralField};
use super::spectrum::MIN_WAVEVECTOR;
use crate::kernels::EvolutionUniforms;

/// Deep-water dispersion relation ω(k) = sqrt(g·|k|)
pub fn dispersion(k_length: f32, gravity: f32) -> f32 {
    (gravity * k_length).sqrt()
}

/// Evolved spectra for one frame
pub struct DisplacementSpectra<'a> {
    /// Vertical displacement h(k, t)
    pub height: &'a mut SpectralField,
    /// Horizontal displacement along x
    pub chop_x: &'a mut SpectralField,
    /// Horizontal displacement along z
    pub chop_z: &'a mut SpectralField,
}

/// Compute h(k,t) = h0(k)·e^{iωt} + conj(h0(−k))·e^{−iωt} and the choppy
/// components i·(k/|k|)·χ·h(k,t) for every bin
pub fn evolve_spectrum(params: &EvolutionUniforms, h0: &SpectralField, out: DisplacementSpectra) {
    let n = params.resolution as usize;

    out.height
        .as_mut_slice()
        .par_chunks_mut(n)
        .zip(out.chop_x.as_mut_slice().par_chunks_mut(n))
        .zip(out.chop_z.as_mut_slice().par_chunks_mut(n))
        .enumerate()
        .for_each(|(z, ((height_row, chop_x_row), chop_z_row))| {
            for x in 0..n {
                let (mx, mz) = mirrored(x, z, n);
                let k = wavevector(x, z, n, params.domain_length);
                let k_length = k.length();

                let phase = dispersion(k_length, params.gravity) * params.time;
                let rotation = Complex::from_polar(1.0, phase);
                let h = h0.get(x, z) * rotation + h0.get(mx, mz).conj() * rotation.conj();
                height_row[x] = h;

                if k_length < MIN_WAVEVECTOR {
                    chop_x_row[x] = Complex::new(0.0, 0.0);
                    chop_z_row[x] = Complex::new(0.0, 0.0);
                } else {
                    let ih = Complex::new(-h.im, h.re) * params.choppiness;
                    chop_x_row[x] = ih * (k.x / k_length);
                    chop_z_row[x] = ih * (k.y / k_length);
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::SpectrumUniforms;
    use crate::ocean::noise::NoiseGenerator;
    use crate::ocean::spectrum::generate_initial_spectrum;
    use crate::params::OceanParams;

    const N: usize = 32;

    fn params() -> OceanParams {
        OceanParams {
            resolution: N as u32,
            ..Default::default()
        }
    }

    fn initial_spectrum(params: &OceanParams) -> SpectralField {
        let noise = NoiseGenerator::new(11).draw(N);
        let mut h0 = SpectralField::filled(N, Complex::new(0.0, 0.0));
        generate_initial_spectrum(&SpectrumUniforms::new(params), &noise, &mut h0);
        h0
    }

    fn evolve(params: &OceanParams, h0: &SpectralField, time: f32) -> [SpectralField; 3] {
        let zero = SpectralField::filled(N, Complex::new(0.0, 0.0));
        let [mut height, mut chop_x, mut chop_z] = [zero.clone(), zero.clone(), zero];
        evolve_spectrum(
            &EvolutionUniforms::new(params, time),
            h0,
            DisplacementSpectra {
                height: &mut height,
                chop_x: &mut chop_x,
                chop_z: &mut chop_z,
            },
        );
        [height, chop_x, chop_z]
    }

    #[test]
    fn test_dispersion_grows_with_wavevector() {
        assert_eq!(dispersion(0.0, 9.81), 0.0);
        assert!(dispersion(2.0, 9.81) > dispersion(1.0, 9.81));
        assert!((dispersion(1.0, 9.81) - 9.81f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_t0_is_conjugate_symmetric_sum() {
        let params = params();
        let h0 = initial_spectrum(&params);
        let [height, _, _] = evolve(&params, &h0, 0.0);

        for z in 0..N {
            for x in 0..N {
                let (mx, mz) = mirrored(x, z, N);
                let expected = h0.get(x, z) + h0.get(mx, mz).conj();
                assert!((height.get(x, z) - expected).norm() <= 1e-6 * (1.0 + expected.norm()));
            }
        }
    }

    #[test]
    fn test_bin_matches_closed_form_at_later_time() {
        let params = params();
        let h0 = initial_spectrum(&params);
        let time = 2.5;
        let [height, chop_x, _] = evolve(&params, &h0, time);

        // k = 2π (3, 1) / L; its mirror sits at (N/2 - 3, N/2 - 1)
        let (x, z) = (N / 2 + 3, N / 2 + 1);
        let unit = 2.0 * std::f32::consts::PI / params.domain_length_m;
        let (kx, kz) = (3.0 * unit, 1.0 * unit);
        let k_length = (kx * kx + kz * kz).sqrt();
        let omega = (params.gravity_m_per_s2 * k_length).sqrt();
        let (sin, cos) = (omega * time).sin_cos();

        let h0_k = *h0.get(x, z);
        let h0_mirror = h0.get(N / 2 - 3, N / 2 - 1).conj();
        assert!(h0_k.norm() > 0.0);
        let expected = h0_k * Complex::new(cos, sin) + h0_mirror * Complex::new(cos, -sin);
        let tolerance = 1e-5 * (1.0 + expected.norm());
        assert!(
            (*height.get(x, z) - expected).norm() <= tolerance,
            "got {}, expected {expected}",
            height.get(x, z)
        );

        let expected_chop_x =
            Complex::new(0.0, 1.0) * expected * (kx / k_length * params.choppiness);
        assert!((*chop_x.get(x, z) - expected_chop_x).norm() <= tolerance * params.choppiness);
    }

    #[test]
    fn test_height_spectrum_is_hermitian() {
        let params = params();
        let h0 = initial_spectrum(&params);
        let [height, chop_x, chop_z] = evolve(&params, &h0, 3.7);

        // Skip the Nyquist row/column, which pairs with itself
        for z in 1..N {
            for x in 1..N {
                let (mx, mz) = mirrored(x, z, N);
                for field in [&height, &chop_x, &chop_z] {
                    let a = *field.get(x, z);
                    let b = field.get(mx, mz).conj();
                    assert!((a - b).norm() <= 1e-3 * (1.0 + a.norm()), "bin ({x},{z})");
                }
            }
        }
    }

    #[test]
    fn test_choppy_fields_vanish_at_origin_and_without_choppiness() {
        let mut params = params();
        let h0 = initial_spectrum(&params);
        let [_, chop_x, chop_z] = evolve(&params, &h0, 1.0);
        assert_eq!(*chop_x.get(N / 2, N / 2), Complex::new(0.0, 0.0));
        assert_eq!(*chop_z.get(N / 2, N / 2), Complex::new(0.0, 0.0));

        params.choppiness = 0.0;
        let [_, chop_x, chop_z] = evolve(&params, &h0, 1.0);
        assert!(chop_x.as_slice().iter().all(|c| c.norm() == 0.0));
        assert!(chop_z.as_slice().iter().all(|c| c.norm() == 0.0));
    }
}
