//! wgpu backend: every stage is one compute pass over device buffers.
//!
//! All bind groups are built at startup, one per (field, axis, stage) for the
//! FFT, so a frame only records passes. Each field owns two storage slots
//! for the ping-pong transform; slot 0 holds the field between stages.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::context::GpuContext;
use super::program::KernelProgram;
use crate::error::{OceanError, Result};
use crate::kernels::{
    EvolutionUniforms, FftUniforms, Kernel, ReorderUniforms, SpectrumUniforms, SurfaceUniforms,
};
use crate::ocean::{FftAxis, FftDirection, FftPlan, FftStage, NoiseField, SurfaceFields};
use crate::pipeline::{WaveBackend, WaveField};

/// How stage ordering is enforced between dependent dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SyncMode {
    /// Record every pass into one submission; wgpu orders passes by their
    /// buffer dependencies
    #[default]
    Dependencies,
    /// Submit and wait for the device at every barrier
    Stall,
}

const COMPLEX_BYTES: u64 = std::mem::size_of::<[f32; 2]>() as u64;
const VEC4_BYTES: u64 = std::mem::size_of::<[f32; 4]>() as u64;

struct Programs {
    spectrum: KernelProgram,
    evolution: KernelProgram,
    fft_rows: KernelProgram,
    fft_columns: KernelProgram,
    reorder: KernelProgram,
    surface: KernelProgram,
}

impl Programs {
    fn load(device: &wgpu::Device, shader_dir: &Path) -> Result<Self> {
        Ok(Self {
            spectrum: KernelProgram::load(device, shader_dir, Kernel::InitialSpectrum)?,
            evolution: KernelProgram::load(device, shader_dir, Kernel::TimeEvolution)?,
            fft_rows: KernelProgram::load(device, shader_dir, Kernel::FftRows)?,
            fft_columns: KernelProgram::load(device, shader_dir, Kernel::FftColumns)?,
            reorder: KernelProgram::load(device, shader_dir, Kernel::Reorder)?,
            surface: KernelProgram::load(device, shader_dir, Kernel::Surface)?,
        })
    }
}

struct Uniforms {
    spectrum: wgpu::Buffer,
    evolution: wgpu::Buffer,
    reorder: wgpu::Buffer,
    surface: wgpu::Buffer,
    /// One buffer per FFT stage, with the values last written to it
    fft: Vec<(wgpu::Buffer, FftUniforms)>,
}

struct BindGroups {
    spectrum: wgpu::BindGroup,
    evolution: wgpu::BindGroup,
    /// [field][axis][stage]
    fft: Vec<[Vec<wgpu::BindGroup>; 2]>,
    reorder: Vec<wgpu::BindGroup>,
    surface: wgpu::BindGroup,
}

/// Field storage and stage execution on a wgpu device
pub struct GpuBackend {
    context: GpuContext,
    resolution: u32,
    sync: SyncMode,
    programs: Programs,
    uniforms: Uniforms,
    bind_groups: BindGroups,
    noise: wgpu::Buffer,
    /// [field][slot]
    fields: Vec<[wgpu::Buffer; 2]>,
    displacement: wgpu::Buffer,
    normals: wgpu::Buffer,
    staging_displacement: wgpu::Buffer,
    staging_normals: wgpu::Buffer,
    encoder: Option<wgpu::CommandEncoder>,
}

fn storage_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_SRC
            | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn staging_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn uniform_buffer<T: Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn encode_dispatch(
    encoder: &mut wgpu::CommandEncoder,
    program: &KernelProgram,
    bind_group: &wgpu::BindGroup,
    resolution: u32,
) {
    let (x, y) = program.kernel.workgroups(resolution);
    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
        label: Some(program.kernel.label()),
        timestamp_writes: None,
    });
    pass.set_pipeline(&program.pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.dispatch_workgroups(x, y, 1);
}

impl GpuBackend {
    /// Compile every kernel and allocate every buffer and bind group
    pub fn new(
        context: GpuContext,
        plan: &FftPlan,
        shader_dir: &Path,
        sync: SyncMode,
    ) -> Result<Self> {
        let device = &context.device;
        let resolution = plan.resolution();
        let samples = resolution as u64 * resolution as u64;

        let programs = Programs::load(device, shader_dir)?;

        let noise = storage_buffer(device, "noise", samples * COMPLEX_BYTES);
        let h0 = storage_buffer(device, "h0", samples * COMPLEX_BYTES);
        let fields: Vec<[wgpu::Buffer; 2]> = WaveField::ALL
            .iter()
            .map(|field| {
                [
                    storage_buffer(device, field.label(), samples * COMPLEX_BYTES),
                    storage_buffer(device, field.label(), samples * COMPLEX_BYTES),
                ]
            })
            .collect();
        let displacement = storage_buffer(device, "displacement", samples * VEC4_BYTES);
        let normals = storage_buffer(device, "normals", samples * VEC4_BYTES);
        let staging_displacement =
            staging_buffer(device, "displacement readback", samples * VEC4_BYTES);
        let staging_normals = staging_buffer(device, "normals readback", samples * VEC4_BYTES);

        let uniforms = Uniforms {
            spectrum: uniform_buffer(device, "spectrum params", &SpectrumUniforms::zeroed()),
            evolution: uniform_buffer(device, "evolution params", &EvolutionUniforms::zeroed()),
            reorder: uniform_buffer(device, "reorder params", &ReorderUniforms::zeroed()),
            surface: uniform_buffer(device, "surface params", &SurfaceUniforms::zeroed()),
            fft: plan
                .stages(FftDirection::Inverse)
                .map(|stage| {
                    (
                        uniform_buffer(device, "fft stage params", &stage.uniforms),
                        stage.uniforms,
                    )
                })
                .collect(),
        };

        let fft_bind_groups: Vec<[Vec<wgpu::BindGroup>; 2]> = fields
            .iter()
            .map(|slots| {
                [&programs.fft_rows, &programs.fft_columns].map(|program| {
                    plan.stages(FftDirection::Inverse)
                        .map(|stage| {
                            let source = &slots[stage.read_slot()];
                            let target = &slots[stage.write_slot()];
                            let params = &uniforms.fft[stage.index as usize].0;
                            program.bind(device, &[params, source, target])
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let bind_groups = BindGroups {
            spectrum: programs
                .spectrum
                .bind(device, &[&uniforms.spectrum, &noise, &h0]),
            evolution: programs.evolution.bind(
                device,
                &[
                    &uniforms.evolution,
                    &h0,
                    &fields[0][0],
                    &fields[1][0],
                    &fields[2][0],
                ],
            ),
            fft: fft_bind_groups,
            reorder: fields
                .iter()
                .map(|slots| programs.reorder.bind(device, &[&uniforms.reorder, &slots[0]]))
                .collect(),
            surface: programs.surface.bind(
                device,
                &[
                    &uniforms.surface,
                    &fields[0][0],
                    &fields[1][0],
                    &fields[2][0],
                    &displacement,
                    &normals,
                ],
            ),
        };

        log::info!(
            "GPU backend ready on {} ({:?} sync, {} bind groups per FFT pass)",
            context.adapter_name,
            sync,
            plan.stage_count()
        );

        Ok(Self {
            context,
            resolution,
            sync,
            programs,
            uniforms,
            bind_groups,
            noise,
            fields,
            displacement,
            normals,
            staging_displacement,
            staging_normals,
            encoder: None,
        })
    }

    fn encoder<'a>(
        device: &wgpu::Device,
        encoder: &'a mut Option<wgpu::CommandEncoder>,
    ) -> &'a mut wgpu::CommandEncoder {
        encoder.get_or_insert_with(|| {
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Ocean Frame Encoder"),
            })
        })
    }

    fn submit(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.context.queue.submit(Some(encoder.finish()));
        }
    }

    fn write_uniform<T: Pod>(&self, buffer: &wgpu::Buffer, value: &T) {
        self.context
            .queue
            .write_buffer(buffer, 0, bytemuck::bytes_of(value));
    }

    fn read_buffer(&self, staging: &wgpu::Buffer, label: &'static str) -> Result<Vec<[f32; 4]>> {
        let slice = staging.slice(..);
        let (sender, receiver) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.context.device.poll(wgpu::Maintain::Wait);
        pollster::block_on(receiver)
            .map_err(|_| OceanError::Readback {
                label,
                reason: "map callback was dropped".to_string(),
            })?
            .map_err(|e| OceanError::Readback {
                label,
                reason: e.to_string(),
            })?;

        let data = slice.get_mapped_range();
        let values = bytemuck::cast_slice::<u8, [f32; 4]>(&data).to_vec();
        drop(data);
        staging.unmap();
        Ok(values)
    }
}

impl WaveBackend for GpuBackend {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn initial_spectrum(&mut self, params: &SpectrumUniforms, noise: &NoiseField) {
        self.write_uniform(&self.uniforms.spectrum, params);
        self.context
            .queue
            .write_buffer(&self.noise, 0, bytemuck::cast_slice(noise.as_slice()));

        let encoder = Self::encoder(&self.context.device, &mut self.encoder);
        encode_dispatch(
            encoder,
            &self.programs.spectrum,
            &self.bind_groups.spectrum,
            self.resolution,
        );
    }

    fn time_evolution(&mut self, params: &EvolutionUniforms) {
        self.write_uniform(&self.uniforms.evolution, params);

        let encoder = Self::encoder(&self.context.device, &mut self.encoder);
        encode_dispatch(
            encoder,
            &self.programs.evolution,
            &self.bind_groups.evolution,
            self.resolution,
        );
    }

    fn fft_stage(&mut self, field: WaveField, axis: FftAxis, stage: &FftStage) {
        let index = stage.index as usize;
        let (buffer, current) = &self.uniforms.fft[index];
        if *current != stage.uniforms {
            self.write_uniform(buffer, &stage.uniforms);
            self.uniforms.fft[index].1 = stage.uniforms;
        }

        let (program, axis_index) = match axis {
            FftAxis::Rows => (&self.programs.fft_rows, 0),
            FftAxis::Columns => (&self.programs.fft_columns, 1),
        };
        let bind_group = &self.bind_groups.fft[field.index()][axis_index][index];

        let encoder = Self::encoder(&self.context.device, &mut self.encoder);
        encode_dispatch(encoder, program, bind_group, self.resolution);
    }

    fn restore(&mut self, field: WaveField) {
        let [primary, scratch] = &self.fields[field.index()];
        let size = primary.size();

        let encoder = Self::encoder(&self.context.device, &mut self.encoder);
        encoder.copy_buffer_to_buffer(scratch, 0, primary, 0, size);
    }

    fn reorder(&mut self, field: WaveField, params: &ReorderUniforms) {
        self.write_uniform(&self.uniforms.reorder, params);

        let encoder = Self::encoder(&self.context.device, &mut self.encoder);
        encode_dispatch(
            encoder,
            &self.programs.reorder,
            &self.bind_groups.reorder[field.index()],
            self.resolution,
        );
    }

    fn derive_surface(&mut self, params: &SurfaceUniforms) {
        self.write_uniform(&self.uniforms.surface, params);

        let encoder = Self::encoder(&self.context.device, &mut self.encoder);
        encode_dispatch(
            encoder,
            &self.programs.surface,
            &self.bind_groups.surface,
            self.resolution,
        );
    }

    fn barrier(&mut self) {
        match self.sync {
            // Separate compute passes already order dependent buffer accesses
            SyncMode::Dependencies => {}
            SyncMode::Stall => {
                self.submit();
                self.context.device.poll(wgpu::Maintain::Wait);
            }
        }
    }

    fn end_frame(&mut self) {
        self.submit();
    }

    fn read_surface(&mut self) -> Result<SurfaceFields> {
        self.submit();

        let size = self.displacement.size();
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Surface Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(&self.displacement, 0, &self.staging_displacement, 0, size);
        encoder.copy_buffer_to_buffer(&self.normals, 0, &self.staging_normals, 0, size);
        self.context.queue.submit(Some(encoder.finish()));

        let displacement = self.read_buffer(&self.staging_displacement, "displacement")?;
        let normals = self.read_buffer(&self.staging_normals, "normals")?;
        Ok(SurfaceFields {
            resolution: self.resolution as usize,
            displacement,
            normals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::CpuBackend;
    use crate::params::OceanParams;
    use crate::pipeline::OceanPipeline;
    use std::path::PathBuf;

    fn shader_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))
    }

    fn max_difference(a: &[[f32; 4]], b: &[[f32; 4]]) -> f32 {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max)
    }

    fn run_on_gpu(params: &OceanParams, sync: SyncMode, time_s: f32) -> Option<SurfaceFields> {
        let context = match GpuContext::blocking() {
            Ok(context) => context,
            Err(e) => {
                eprintln!("skipping GPU test: {e}");
                return None;
            }
        };
        let plan = FftPlan::new(params.resolution).unwrap();
        let backend = GpuBackend::new(context, &plan, &shader_dir(), sync).unwrap();
        let mut pipeline = OceanPipeline::new(backend, params.clone()).unwrap();
        pipeline.run_frame(time_s);
        Some(pipeline.read_surface().unwrap())
    }

    #[test]
    fn test_gpu_matches_cpu() {
        // N = 32: odd stage count exercises the slot restore copy
        let params = OceanParams {
            resolution: 32,
            domain_length_m: 64.0,
            ..Default::default()
        };
        let time_s = 1.25;

        let mut cpu = OceanPipeline::new(CpuBackend::new(32), params.clone()).unwrap();
        cpu.run_frame(time_s);
        let expected = cpu.read_surface().unwrap();

        for sync in [SyncMode::Dependencies, SyncMode::Stall] {
            let Some(actual) = run_on_gpu(&params, sync, time_s) else {
                return;
            };
            let scale = expected
                .displacement
                .iter()
                .flatten()
                .fold(0.0f32, |m, v| m.max(v.abs()));
            assert!(scale > 0.0);
            assert!(max_difference(&actual.displacement, &expected.displacement) < 1e-3 * scale);
            assert!(max_difference(&actual.normals, &expected.normals) < 1e-3);
        }
    }

    #[test]
    fn test_missing_shader_dir_is_reported() {
        let context = match GpuContext::blocking() {
            Ok(context) => context,
            Err(e) => {
                eprintln!("skipping GPU test: {e}");
                return;
            }
        };
        let plan = FftPlan::new(16).unwrap();
        let result = GpuBackend::new(
            context,
            &plan,
            Path::new("/nonexistent/shaders"),
            SyncMode::Dependencies,
        );
        assert!(matches!(
            result,
            Err(OceanError::MissingKernelSource { .. })
        ));
    }
}
