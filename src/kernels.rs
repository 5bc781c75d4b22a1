//! Kernel catalogue and the per-kernel parameter blocks.
//!
//! Every stage takes one `#[repr(C)]` parameter struct. The same struct is
//! uploaded as a uniform buffer by the GPU backend and read directly by the
//! CPU backend, so both execute from identical inputs. Field layout matches
//! the WGSL declarations in `shaders/` (16-byte multiples, std140 rules).

use bytemuck::{Pod, Zeroable};

use crate::params::OceanParams;

/// Workgroup edge for the 2D per-sample kernels (16×16 invocations)
pub const GRID_WORKGROUP: u32 = 16;

/// Workgroup width for the FFT kernels (one invocation per butterfly)
pub const FFT_WORKGROUP: u32 = 64;

/// Ratio between the small-wave suppression length and the largest wind wave
pub const SMALL_WAVE_RATIO: f32 = 1.0e-3;

/// One pipeline stage, backed by a WGSL program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    InitialSpectrum,
    TimeEvolution,
    FftRows,
    FftColumns,
    Reorder,
    Surface,
}

impl Kernel {
    pub const ALL: [Kernel; 6] = [
        Kernel::InitialSpectrum,
        Kernel::TimeEvolution,
        Kernel::FftRows,
        Kernel::FftColumns,
        Kernel::Reorder,
        Kernel::Surface,
    ];

    /// Program source file, relative to the shader directory
    pub fn file_name(self) -> &'static str {
        match self {
            Kernel::InitialSpectrum => "spectrum_0.wgsl",
            Kernel::TimeEvolution => "spectrum_t.wgsl",
            Kernel::FftRows | Kernel::FftColumns => "fft.wgsl",
            Kernel::Reorder => "reorder.wgsl",
            Kernel::Surface => "normals.wgsl",
        }
    }

    pub fn entry_point(self) -> &'static str {
        match self {
            Kernel::FftRows => "fft_rows",
            Kernel::FftColumns => "fft_columns",
            _ => "main",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Kernel::InitialSpectrum => "initial spectrum",
            Kernel::TimeEvolution => "time evolution",
            Kernel::FftRows => "fft rows",
            Kernel::FftColumns => "fft columns",
            Kernel::Reorder => "reorder",
            Kernel::Surface => "surface normals",
        }
    }

    /// Workgroup counts covering an N×N domain
    pub fn workgroups(self, resolution: u32) -> (u32, u32) {
        match self {
            // One invocation per butterfly: N/2 per line, N lines
            Kernel::FftRows | Kernel::FftColumns => {
                ((resolution / 2).div_ceil(FFT_WORKGROUP), resolution)
            }
            _ => {
                let groups = resolution.div_ceil(GRID_WORKGROUP);
                (groups, groups)
            }
        }
    }
}

/// Parameters of the initial (Phillips) spectrum kernel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpectrumUniforms {
    pub resolution: u32,
    pub domain_length: f32,
    pub amplitude: f32,
    pub gravity: f32,
    pub wind: [f32; 2],
    pub small_wave_ratio: f32,
    pub _padding: f32,
}

impl SpectrumUniforms {
    pub fn new(params: &OceanParams) -> Self {
        Self {
            resolution: params.resolution,
            domain_length: params.domain_length_m,
            amplitude: params.amplitude,
            gravity: params.gravity_m_per_s2,
            wind: params.wind.vector().to_array(),
            small_wave_ratio: SMALL_WAVE_RATIO,
            _padding: 0.0,
        }
    }
}

/// Parameters of the time evolution kernel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EvolutionUniforms {
    pub resolution: u32,
    pub domain_length: f32,
    pub choppiness: f32,
    pub time: f32,
    pub gravity: f32,
    pub _padding: [f32; 3],
}

impl EvolutionUniforms {
    pub fn new(params: &OceanParams, time_s: f32) -> Self {
        Self {
            resolution: params.resolution,
            domain_length: params.domain_length_m,
            choppiness: params.choppiness,
            time: time_s,
            gravity: params.gravity_m_per_s2,
            _padding: [0.0; 3],
        }
    }
}

/// Parameters of one FFT stage (shared by the row and column kernels)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FftUniforms {
    pub resolution: u32,
    /// Half-size of the sub-transforms merged by this stage (1, 2, …, N/2)
    pub stride: u32,
    /// +1 for the inverse transform, -1 for the forward transform
    pub direction: f32,
    /// Per-stage output scale (½ for the inverse, 1 for the forward)
    pub scale: f32,
}

/// Parameters of the checkerboard reorder kernel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ReorderUniforms {
    pub resolution: u32,
    pub _padding: [u32; 3],
}

impl ReorderUniforms {
    pub fn new(params: &OceanParams) -> Self {
        Self {
            resolution: params.resolution,
            _padding: [0; 3],
        }
    }
}

/// Parameters of the displacement/normal kernel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SurfaceUniforms {
    pub resolution: u32,
    pub texel_length: f32,
    pub _padding: [f32; 2],
}

impl SurfaceUniforms {
    pub fn new(params: &OceanParams) -> Self {
        Self {
            resolution: params.resolution,
            texel_length: params.texel_length_m(),
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<SpectrumUniforms>(), 32);
        assert_eq!(std::mem::size_of::<EvolutionUniforms>(), 32);
        assert_eq!(std::mem::size_of::<FftUniforms>(), 16);
        assert_eq!(std::mem::size_of::<ReorderUniforms>(), 16);
        assert_eq!(std::mem::size_of::<SurfaceUniforms>(), 16);
    }

    #[test]
    fn test_workgroups_cover_domain() {
        assert_eq!(Kernel::InitialSpectrum.workgroups(256), (16, 16));
        assert_eq!(Kernel::FftRows.workgroups(256), (2, 256));
        // Small grids still get at least one group
        assert_eq!(Kernel::FftColumns.workgroups(8), (1, 8));
        assert_eq!(Kernel::Surface.workgroups(8), (1, 1));
    }

    #[test]
    fn test_fft_kernels_share_a_source() {
        assert_eq!(Kernel::FftRows.file_name(), Kernel::FftColumns.file_name());
        assert_ne!(Kernel::FftRows.entry_point(), Kernel::FftColumns.entry_point());
    }
}
