//! Gaussian noise feeding the initial spectrum.
//!
//! Each spectral bin gets an independent pair of standard-normal samples
//! (real and imaginary parts). The field is drawn once and reused until the
//! wind changes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::field::Grid;

/// N×N grid of standard-normal sample pairs
pub type NoiseField = Grid<[f32; 2]>;

/// Seeded source of noise fields
pub struct NoiseGenerator {
    rng: StdRng,
}

impl NoiseGenerator {
    /// Create new noise generator with seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh N×N field; successive calls continue the same stream
    pub fn draw(&mut self, resolution: usize) -> NoiseField {
        let samples: Vec<[f32; 2]> = (0..resolution * resolution)
            .map(|_| [self.rng.sample(StandardNormal), self.rng.sample(StandardNormal)])
            .collect();
        Grid::from_samples(resolution, samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let a = NoiseGenerator::new(7).draw(16);
        let b = NoiseGenerator::new(7).draw(16);
        assert_eq!(a, b);
    }

    #[test]
    fn test_successive_draws_differ() {
        let mut generator = NoiseGenerator::new(7);
        let a = generator.draw(16);
        let b = generator.draw(16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_samples_are_roughly_standard_normal() {
        let field = NoiseGenerator::new(1).draw(64);
        let values: Vec<f32> = field.as_slice().iter().flatten().copied().collect();
        let mean = values.iter().sum::<f32>() / values.len() as f32;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;

        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((variance - 1.0).abs() < 0.1, "variance {variance}");
    }
}
