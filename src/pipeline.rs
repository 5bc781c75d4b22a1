//! Per-frame orchestration of the wave stages.
//!
//! `OceanPipeline` owns the control state (parameters, noise stream, the
//! spectrum-dirty flag) and issues stages in program order to a `WaveBackend`.
//! Backends own the field storage and execute each stage as one data-parallel
//! dispatch over the N×N grid.

use crate::error::{OceanError, Result};
use crate::kernels::{EvolutionUniforms, ReorderUniforms, SpectrumUniforms, SurfaceUniforms};
use crate::ocean::{
    FftAxis, FftDirection, FftPlan, FftStage, NoiseField, NoiseGenerator, SurfaceFields,
};
use crate::params::{OceanParams, Wind, CHOPPINESS_RANGE};

/// Evolved fields, each transformed to the spatial domain independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveField {
    Height,
    ChopX,
    ChopZ,
}

impl WaveField {
    pub const ALL: [WaveField; 3] = [WaveField::Height, WaveField::ChopX, WaveField::ChopZ];

    pub fn index(self) -> usize {
        match self {
            WaveField::Height => 0,
            WaveField::ChopX => 1,
            WaveField::ChopZ => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaveField::Height => "height",
            WaveField::ChopX => "chop x",
            WaveField::ChopZ => "chop z",
        }
    }
}

/// Executor of the wave stages.
///
/// Frame stages cannot fail: every resource they touch is created and
/// validated when the backend is built.
pub trait WaveBackend {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Grid side N the field storage was allocated for
    fn resolution(&self) -> u32;

    /// h0 from the noise field
    fn initial_spectrum(&mut self, params: &SpectrumUniforms, noise: &NoiseField);

    /// h, Dx, Dz at time t from h0
    fn time_evolution(&mut self, params: &EvolutionUniforms);

    /// One FFT stage of `field`, reading slot `stage.read_slot()`
    fn fft_stage(&mut self, field: WaveField, axis: FftAxis, stage: &FftStage);

    /// Move a result sitting in slot 1 of `field` back to slot 0
    fn restore(&mut self, field: WaveField);

    /// Checkerboard sign flip of `field` in place
    fn reorder(&mut self, field: WaveField, params: &ReorderUniforms);

    /// Displacement and normals from the three spatial fields
    fn derive_surface(&mut self, params: &SurfaceUniforms);

    /// Order every write issued so far before every later read
    fn barrier(&mut self);

    /// Submit the frame's work
    fn end_frame(&mut self);

    /// Copy the current surface fields to host memory
    fn read_surface(&mut self) -> Result<SurfaceFields>;
}

/// Summary of one simulated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub time_s: f32,
    /// Whether noise and h0 were rebuilt this frame
    pub regenerated: bool,
}

/// Drives a backend through the full frame: spectrum (when dirty), evolution,
/// inverse FFT per field, reorder, surface derivation
pub struct OceanPipeline<B: WaveBackend> {
    backend: B,
    params: OceanParams,
    plan: FftPlan,
    noise_generator: NoiseGenerator,
    spectrum_dirty: bool,
    regenerations: u64,
}

impl<B: WaveBackend> OceanPipeline<B> {
    /// Validate parameters and wrap the backend; the first frame builds h0
    pub fn new(backend: B, params: OceanParams) -> Result<Self> {
        params.validate()?;
        let plan = FftPlan::new(params.resolution)?;
        if backend.resolution() != params.resolution {
            log::error!(
                "{} backend holds {}² fields but the pipeline runs N = {}",
                backend.name(),
                backend.resolution(),
                params.resolution
            );
            return Err(OceanError::InvalidResolution(backend.resolution()));
        }
        log::info!(
            "Ocean pipeline: {} backend, N = {}, L = {} m, {} FFT stages per pass",
            backend.name(),
            params.resolution,
            params.domain_length_m,
            plan.stage_count()
        );

        Ok(Self {
            noise_generator: NoiseGenerator::new(params.noise_seed),
            backend,
            params,
            plan,
            spectrum_dirty: true,
            regenerations: 0,
        })
    }

    pub fn params(&self) -> &OceanParams {
        &self.params
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of times the noise field and h0 have been rebuilt
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn is_spectrum_dirty(&self) -> bool {
        self.spectrum_dirty
    }

    /// Update the wind; marks the spectrum dirty only when the value changed.
    /// Non-finite values are ignored.
    pub fn set_wind(&mut self, wind: Wind) {
        let clamped = wind.clamped_with_warning();
        if let Err(e) = clamped.validate() {
            log::warn!("Ignoring wind update: {e}");
            return;
        }
        if clamped != self.params.wind {
            self.params.wind = clamped;
            self.spectrum_dirty = true;
        }
    }

    /// Update the horizontal displacement scale; takes effect next frame
    pub fn set_choppiness(&mut self, choppiness: f32) {
        let clamped = choppiness.clamp(*CHOPPINESS_RANGE.start(), *CHOPPINESS_RANGE.end());
        if clamped != choppiness {
            log::warn!("Choppiness {choppiness} outside slider range, clamped to {clamped}");
        }
        self.params.choppiness = clamped;
    }

    /// Run every stage for time `time_s`
    pub fn run_frame(&mut self, time_s: f32) -> FrameReport {
        let regenerated = self.spectrum_dirty;
        if regenerated {
            self.regenerate_spectrum();
        }

        self.backend
            .time_evolution(&EvolutionUniforms::new(&self.params, time_s));
        self.backend.barrier();

        for field in WaveField::ALL {
            self.inverse_transform(field);
        }

        let reorder = ReorderUniforms::new(&self.params);
        for field in WaveField::ALL {
            self.backend.reorder(field, &reorder);
        }
        self.backend.barrier();

        self.backend
            .derive_surface(&SurfaceUniforms::new(&self.params));
        self.backend.end_frame();

        FrameReport {
            time_s,
            regenerated,
        }
    }

    /// Copy the latest surface fields out of the backend
    pub fn read_surface(&mut self) -> Result<SurfaceFields> {
        self.backend.read_surface()
    }

    fn regenerate_spectrum(&mut self) {
        let noise = self
            .noise_generator
            .draw(self.params.resolution as usize);
        self.backend
            .initial_spectrum(&SpectrumUniforms::new(&self.params), &noise);
        self.backend.barrier();
        self.spectrum_dirty = false;
        self.regenerations += 1;
        log::debug!(
            "Regenerated spectrum #{} for wind {} m/s at {}°",
            self.regenerations,
            self.params.wind.speed_m_per_s,
            self.params.wind.angle_deg
        );
    }

    /// Rows fully, then columns, each pass ending with the result in slot 0
    fn inverse_transform(&mut self, field: WaveField) {
        for axis in [FftAxis::Rows, FftAxis::Columns] {
            for stage in self.plan.stages(FftDirection::Inverse) {
                self.backend.fft_stage(field, axis, &stage);
                self.backend.barrier();
            }
            if self.plan.needs_restore() {
                self.backend.restore(field);
                self.backend.barrier();
            }
        }
    }
}
