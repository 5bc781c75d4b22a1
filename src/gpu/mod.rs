//! GPU execution of the wave stages through wgpu compute pipelines.

mod backend;
mod context;
mod program;

pub use backend::{GpuBackend, SyncMode};
pub use context::GpuContext;
pub use program::{bindings, read_source, Binding, KernelProgram};
