//! Square sample grids shared by every pipeline stage.

use std::f32::consts::PI;

use glam::Vec2;
use rustfft::num_complex::Complex32;

/// One complex spectral (or untransformed spatial) sample
pub type Complex = Complex32;

/// N×N grid stored row-major: sample (x, z) lives at `z * N + x`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    resolution: usize,
    samples: Vec<T>,
}

/// Frequency-domain field, one complex amplitude per wavevector
pub type SpectralField = Grid<Complex>;

impl<T: Clone> Grid<T> {
    /// Grid filled with one value
    pub fn filled(resolution: usize, value: T) -> Self {
        Self {
            resolution,
            samples: vec![value; resolution * resolution],
        }
    }
}

impl<T> Grid<T> {
    /// Wrap row-major samples; `samples.len()` must be `resolution²`
    pub fn from_samples(resolution: usize, samples: Vec<T>) -> Self {
        assert_eq!(
            samples.len(),
            resolution * resolution,
            "grid sample count must be resolution squared"
        );
        Self {
            resolution,
            samples,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn index(&self, x: usize, z: usize) -> usize {
        z * self.resolution + x
    }

    pub fn get(&self, x: usize, z: usize) -> &T {
        &self.samples[self.index(x, z)]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.samples
    }
}

/// Wavevector of spectral bin (x, z): `2π (x - N/2, z - N/2) / L`
///
/// The k = 0 bin sits at (N/2, N/2).
pub fn wavevector(x: usize, z: usize, resolution: usize, domain_length_m: f32) -> Vec2 {
    let half = (resolution / 2) as f32;
    Vec2::new(x as f32 - half, z as f32 - half) * (2.0 * PI / domain_length_m)
}

/// Bin holding the negated wavevector of (x, z)
///
/// The Nyquist row/column (index 0) has no representable negation and maps to itself.
pub fn mirrored(x: usize, z: usize, resolution: usize) -> (usize, usize) {
    (
        (resolution - x) % resolution,
        (resolution - z) % resolution,
    )
}
