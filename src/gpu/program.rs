//! Loading and compiling the WGSL kernels.
//!
//! Each kernel reads its source from `<shader dir>/<file>` at startup, so a
//! kernel can be edited without rebuilding. Compilation errors are captured
//! through a validation error scope and reported with the source path.

use std::path::{Path, PathBuf};

use crate::error::{OceanError, Result};
use crate::kernels::Kernel;

/// Kind of resource bound at one binding slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Uniform,
    StorageRead,
    StorageReadWrite,
}

impl Binding {
    fn layout_entry(self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        let ty = match self {
            Binding::Uniform => wgpu::BufferBindingType::Uniform,
            Binding::StorageRead => wgpu::BufferBindingType::Storage { read_only: true },
            Binding::StorageReadWrite => wgpu::BufferBindingType::Storage { read_only: false },
        };
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }
    }
}

/// Bindings of group 0, in binding order, as declared by each kernel
pub fn bindings(kernel: Kernel) -> &'static [Binding] {
    use Binding::*;
    match kernel {
        // params, noise, h0
        Kernel::InitialSpectrum => &[Uniform, StorageRead, StorageReadWrite],
        // params, h0, height, chop x, chop z
        Kernel::TimeEvolution => &[
            Uniform,
            StorageRead,
            StorageReadWrite,
            StorageReadWrite,
            StorageReadWrite,
        ],
        // params, source slot, target slot
        Kernel::FftRows | Kernel::FftColumns => &[Uniform, StorageRead, StorageReadWrite],
        // params, field
        Kernel::Reorder => &[Uniform, StorageReadWrite],
        // params, height, chop x, chop z, displacement, normals
        Kernel::Surface => &[
            Uniform,
            StorageRead,
            StorageRead,
            StorageRead,
            StorageReadWrite,
            StorageReadWrite,
        ],
    }
}

/// Read a kernel's WGSL source, returning the path it was read from
pub fn read_source(shader_dir: &Path, kernel: Kernel) -> Result<(PathBuf, String)> {
    let path = shader_dir.join(kernel.file_name());
    match std::fs::read_to_string(&path) {
        Ok(source) => Ok((path, source)),
        Err(source) => {
            log::warn!("Kernel source not found: {}", path.display());
            Err(OceanError::MissingKernelSource { path, source })
        }
    }
}

/// A compiled kernel with its bind group layout
pub struct KernelProgram {
    pub kernel: Kernel,
    pub layout: wgpu::BindGroupLayout,
    pub pipeline: wgpu::ComputePipeline,
}

impl KernelProgram {
    pub fn load(device: &wgpu::Device, shader_dir: &Path, kernel: Kernel) -> Result<Self> {
        let (path, source) = read_source(shader_dir, kernel)?;

        let entries: Vec<wgpu::BindGroupLayoutEntry> = bindings(kernel)
            .iter()
            .enumerate()
            .map(|(i, binding)| binding.layout_entry(i as u32))
            .collect();
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(kernel.label()),
            entries: &entries,
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(kernel.label()),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(kernel.label()),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(kernel.label()),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some(kernel.entry_point()),
            compilation_options: Default::default(),
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(OceanError::KernelCompile {
                path,
                entry_point: kernel.entry_point(),
                diagnostic: error.to_string(),
            });
        }

        log::info!("Compiled kernel `{}` from {}", kernel.entry_point(), path.display());
        Ok(Self {
            kernel,
            layout,
            pipeline,
        })
    }

    /// Bind group over `buffers`, one per binding slot in order
    pub fn bind(&self, device: &wgpu::Device, buffers: &[&wgpu::Buffer]) -> wgpu::BindGroup {
        debug_assert_eq!(buffers.len(), bindings(self.kernel).len());
        let entries: Vec<wgpu::BindGroupEntry> = buffers
            .iter()
            .enumerate()
            .map(|(i, buffer)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: buffer.as_entire_binding(),
            })
            .collect();
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.kernel.label()),
            layout: &self.layout,
            entries: &entries,
        })
    }
}
