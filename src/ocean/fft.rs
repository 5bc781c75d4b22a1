//! Separable radix-2 FFT staged over ping-pong buffers.
//!
//! Each 1D pass is a Stockham transform: log2(N) stages, stage `s` merging
//! sub-transforms of half-size `stride = 2^s`. No bit reversal is needed, but
//! every stage reads one buffer and writes the other, so the two buffers swap
//! roles on each stage. Where the result lands is fixed by the stage count
//! parity, which `FftPlan` derives from log2(N).

use std::f32::consts::PI;

use rayon::prelude::*;

use super::field::{Complex, SpectralField};
use crate::error::{OceanError, Result};
use crate::kernels::FftUniforms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftDirection {
    /// Spectral to spatial, normalized by 1/N per pass
    Inverse,
    /// Spatial to spectral, unnormalized
    Forward,
}

impl FftDirection {
    /// Sign of the twiddle exponent
    pub fn sign(self) -> f32 {
        match self {
            FftDirection::Inverse => 1.0,
            FftDirection::Forward => -1.0,
        }
    }

    /// Scale applied to every stage output (½ per stage gives 1/N per pass)
    pub fn stage_scale(self) -> f32 {
        match self {
            FftDirection::Inverse => 0.5,
            FftDirection::Forward => 1.0,
        }
    }
}

/// Which 1D lines a pass transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftAxis {
    /// Along x, one line per row
    Rows,
    /// Along z, one line per column
    Columns,
}

/// Stage schedule for an N-point transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftPlan {
    resolution: u32,
    stage_count: u32,
}

impl FftPlan {
    /// Plan for N-point lines; N must be a power of two (at least 2)
    pub fn new(resolution: u32) -> Result<Self> {
        if resolution < 2 || !resolution.is_power_of_two() {
            return Err(OceanError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution,
            stage_count: resolution.trailing_zeros(),
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// log2(N)
    pub fn stage_count(&self) -> u32 {
        self.stage_count
    }

    /// Slot holding the result after all stages: `log2(N) mod 2`
    pub fn result_slot(&self) -> usize {
        (self.stage_count % 2) as usize
    }

    /// Whether the result must be copied back into slot 0 after a pass
    pub fn needs_restore(&self) -> bool {
        self.result_slot() != 0
    }

    pub fn stages(&self, direction: FftDirection) -> impl Iterator<Item = FftStage> {
        let resolution = self.resolution;
        (0..self.stage_count).map(move |index| FftStage {
            index,
            uniforms: FftUniforms {
                resolution,
                stride: 1 << index,
                direction: direction.sign(),
                scale: direction.stage_scale(),
            },
        })
    }
}

/// One stage of a 1D pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FftStage {
    pub index: u32,
    pub uniforms: FftUniforms,
}

impl FftStage {
    pub fn read_slot(&self) -> usize {
        (self.index % 2) as usize
    }

    pub fn write_slot(&self) -> usize {
        1 - self.read_slot()
    }
}

/// Two storage slots alternating as read source and write target.
///
/// Slot 0 is the field's identity: callers hand data in and read results
/// out of slot 0 only.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    slots: [T; 2],
}

impl<T> PingPong<T> {
    pub fn new(primary: T, scratch: T) -> Self {
        Self {
            slots: [primary, scratch],
        }
    }

    pub fn primary(&self) -> &T {
        &self.slots[0]
    }

    pub fn primary_mut(&mut self) -> &mut T {
        &mut self.slots[0]
    }

    pub fn slot(&self, index: usize) -> &T {
        &self.slots[index]
    }

    /// Borrow slot `read` immutably and the other slot mutably
    pub fn read_write(&mut self, read: usize) -> (&T, &mut T) {
        let (first, second) = self.slots.split_at_mut(1);
        if read == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        }
    }

    /// Exchange the slots, moving a result sitting in slot 1 into slot 0
    pub fn swap_slots(&mut self) {
        self.slots.swap(0, 1);
    }
}

impl<T: Clone> PingPong<T> {
    /// Pair whose scratch slot starts as a copy of `primary`
    pub fn with_scratch(primary: T) -> Self {
        let scratch = primary.clone();
        Self::new(primary, scratch)
    }
}

/// Output of the butterfly feeding line position `r`.
///
/// Position r belongs to butterfly `j` (top or bottom output); returns
/// `(j, k, top)` where `k = j mod stride` picks the twiddle.
fn butterfly_source(r: usize, stride: usize) -> (usize, usize, bool) {
    let group = r / (2 * stride);
    let within = r % (2 * stride);
    let top = within < stride;
    let k = if top { within } else { within - stride };
    (group * stride + k, k, top)
}

fn twiddle(k: usize, stage: &FftUniforms) -> Complex {
    Complex::from_polar(1.0, stage.direction * PI * k as f32 / stage.stride as f32)
}

fn combine(a: Complex, b: Complex, w: Complex, top: bool, scale: f32) -> Complex {
    let bw = b * w;
    if top {
        (a + bw) * scale
    } else {
        (a - bw) * scale
    }
}

/// Run one FFT stage over every line of an N×N field.
///
/// Written in gather form: each output sample pulls the two inputs of its
/// butterfly, so rows of the target can be filled independently.
pub fn run_stage(stage: &FftUniforms, axis: FftAxis, source: &[Complex], target: &mut [Complex]) {
    let n = stage.resolution as usize;
    let half = n / 2;
    let stride = stage.stride as usize;

    match axis {
        FftAxis::Rows => {
            target
                .par_chunks_mut(n)
                .zip(source.par_chunks(n))
                .for_each(|(out, line)| {
                    for (r, sample) in out.iter_mut().enumerate() {
                        let (j, k, top) = butterfly_source(r, stride);
                        *sample =
                            combine(line[j], line[j + half], twiddle(k, stage), top, stage.scale);
                    }
                });
        }
        FftAxis::Columns => {
            target.par_chunks_mut(n).enumerate().for_each(|(r, out)| {
                let (j, k, top) = butterfly_source(r, stride);
                let w = twiddle(k, stage);
                let a_row = &source[j * n..(j + 1) * n];
                let b_row = &source[(j + half) * n..(j + half + 1) * n];
                for (c, sample) in out.iter_mut().enumerate() {
                    *sample = combine(a_row[c], b_row[c], w, top, stage.scale);
                }
            });
        }
    }
}

/// Run every stage of one pass, leaving the result in slot 0
pub fn transform_pass(
    plan: &FftPlan,
    axis: FftAxis,
    direction: FftDirection,
    buffers: &mut PingPong<SpectralField>,
) {
    for stage in plan.stages(direction) {
        let (source, target) = buffers.read_write(stage.read_slot());
        run_stage(&stage.uniforms, axis, source.as_slice(), target.as_mut_slice());
    }
    if plan.needs_restore() {
        buffers.swap_slots();
    }
}

/// Full 2D transform: every row, then every column
pub fn transform_2d(plan: &FftPlan, direction: FftDirection, buffers: &mut PingPong<SpectralField>) {
    transform_pass(plan, FftAxis::Rows, direction, buffers);
    transform_pass(plan, FftAxis::Columns, direction, buffers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rustfft::FftPlanner;

    fn random_field(n: usize, seed: u64) -> SpectralField {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = (0..n * n)
            .map(|_| Complex::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();
        SpectralField::from_samples(n, samples)
    }

    fn max_error(a: &[Complex], b: &[Complex]) -> f32 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f32::max)
    }

    /// Reference 2D inverse transform via rustfft, normalized by 1/N²
    fn reference_inverse(field: &SpectralField) -> Vec<Complex> {
        let n = field.resolution();
        let fft = FftPlanner::new().plan_fft_inverse(n);
        let mut data = field.as_slice().to_vec();

        for row in data.chunks_mut(n) {
            fft.process(row);
        }
        for c in 0..n {
            let mut column: Vec<Complex> = (0..n).map(|r| data[r * n + c]).collect();
            fft.process(&mut column);
            for (r, value) in column.into_iter().enumerate() {
                data[r * n + c] = value;
            }
        }

        let scale = 1.0 / (n * n) as f32;
        data.iter().map(|c| *c * scale).collect()
    }

    #[test]
    fn test_plan_rejects_non_power_of_two() {
        assert!(FftPlan::new(0).is_err());
        assert!(FftPlan::new(1).is_err());
        assert!(FftPlan::new(48).is_err());
        assert!(FftPlan::new(64).is_ok());
    }

    #[test]
    fn test_result_slot_follows_stage_parity() {
        let plan = FftPlan::new(256).unwrap();
        assert_eq!(plan.stage_count(), 8);
        assert_eq!(plan.result_slot(), 0);
        assert!(!plan.needs_restore());

        let plan = FftPlan::new(128).unwrap();
        assert_eq!(plan.stage_count(), 7);
        assert_eq!(plan.result_slot(), 1);
        assert!(plan.needs_restore());
    }

    #[test]
    fn test_stage_strides_double() {
        let plan = FftPlan::new(16).unwrap();
        let strides: Vec<u32> = plan
            .stages(FftDirection::Inverse)
            .map(|s| s.uniforms.stride)
            .collect();
        assert_eq!(strides, vec![1, 2, 4, 8]);

        let slots: Vec<(usize, usize)> = plan
            .stages(FftDirection::Inverse)
            .map(|s| (s.read_slot(), s.write_slot()))
            .collect();
        assert_eq!(slots, vec![(0, 1), (1, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_inverse_matches_rustfft() {
        for n in [2, 8, 16, 32] {
            let plan = FftPlan::new(n as u32).unwrap();
            let field = random_field(n, n as u64);
            let expected = reference_inverse(&field);

            let mut buffers = PingPong::with_scratch(field);
            transform_2d(&plan, FftDirection::Inverse, &mut buffers);

            let error = max_error(buffers.primary().as_slice(), &expected);
            assert!(error < 1e-5, "N = {n}: max error {error}");
        }
    }

    #[test]
    fn test_forward_of_inverse_round_trips() {
        // 8 and 32 have an odd stage count and exercise the restore path
        for n in [4, 8, 16, 32, 64] {
            let plan = FftPlan::new(n as u32).unwrap();
            let field = random_field(n, 100 + n as u64);

            let mut buffers = PingPong::with_scratch(field.clone());
            transform_2d(&plan, FftDirection::Inverse, &mut buffers);
            transform_2d(&plan, FftDirection::Forward, &mut buffers);

            let error = max_error(buffers.primary().as_slice(), field.as_slice());
            assert!(error < 1e-4, "N = {n}: max error {error}");
        }
    }

    #[test]
    fn test_single_frequency_becomes_plane_wave() {
        let n = 16;
        let plan = FftPlan::new(n as u32).unwrap();
        let mut field = SpectralField::filled(n, Complex::new(0.0, 0.0));
        // Frequency 1 along x
        field.as_mut_slice()[1] = Complex::new((n * n) as f32, 0.0);

        let mut buffers = PingPong::with_scratch(field);
        transform_2d(&plan, FftDirection::Inverse, &mut buffers);

        let out = buffers.primary();
        for z in 0..n {
            for x in 0..n {
                let angle = 2.0 * PI * x as f32 / n as f32;
                let expected = Complex::new(angle.cos(), angle.sin());
                assert!((out.get(x, z) - expected).norm() < 1e-4);
            }
        }
    }
}
