//! Checkerboard sign flip applied after the inverse FFT.
//!
//! The spectrum stores k = 0 at (N/2, N/2) rather than at the origin, which
//! shifts every spatial sample by a phase of (−1)^(x+z). Multiplying by the
//! same factor undoes it.

use rayon::prelude::*;

use super::field::SpectralField;
use crate::kernels::ReorderUniforms;

/// Sign of sample (x, z): +1 on even cells, −1 on odd ones
pub fn checkerboard_sign(x: usize, z: usize) -> f32 {
    if (x + z) % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Multiply every sample of `field` by (−1)^(x+z), in place
pub fn reorder(params: &ReorderUniforms, field: &mut SpectralField) {
    let n = params.resolution as usize;
    field
        .as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(z, row)| {
            for (x, sample) in row.iter_mut().enumerate() {
                *sample *= checkerboard_sign(x, z);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::field::Complex;

    fn uniforms(n: u32) -> ReorderUniforms {
        ReorderUniforms {
            resolution: n,
            _padding: [0; 3],
        }
    }

    #[test]
    fn test_checkerboard_pattern() {
        let mut field = SpectralField::filled(4, Complex::new(1.0, 2.0));
        reorder(&uniforms(4), &mut field);

        assert_eq!(*field.get(0, 0), Complex::new(1.0, 2.0));
        assert_eq!(*field.get(1, 0), Complex::new(-1.0, -2.0));
        assert_eq!(*field.get(0, 1), Complex::new(-1.0, -2.0));
        assert_eq!(*field.get(3, 3), Complex::new(1.0, 2.0));
    }

    #[test]
    fn test_reorder_twice_is_identity() {
        let samples = (0..64)
            .map(|i| Complex::new(i as f32 * 0.25, -(i as f32)))
            .collect();
        let original = SpectralField::from_samples(8, samples);

        let mut field = original.clone();
        reorder(&uniforms(8), &mut field);
        assert_ne!(field, original);
        reorder(&uniforms(8), &mut field);
        assert_eq!(field, original);
    }
}
