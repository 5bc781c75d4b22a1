//! Startup and configuration errors.
//!
//! Every variant describes a condition detected before the first frame runs.
//! Frame stages never fail; a broken stage is a defect, not a runtime event.

use std::path::PathBuf;

/// Errors raised while validating parameters, loading kernels, or acquiring a device
#[derive(Debug, thiserror::Error)]
pub enum OceanError {
    #[error("resolution {0} is not a power of two (minimum 2)")]
    InvalidResolution(u32),

    #[error("parameter `{name}` = {value} is outside its valid domain ({expected})")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("tile ring side {0} must be odd and at least 1")]
    InvalidTileRing(u32),

    #[error("kernel source {path} could not be read: {source}")]
    MissingKernelSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel {path} (entry `{entry_point}`) failed to compile:\n{diagnostic}")]
    KernelCompile {
        path: PathBuf,
        entry_point: &'static str,
        diagnostic: String,
    },

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to request GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to read back `{label}` from the device: {reason}")]
    Readback { label: &'static str, reason: String },

    #[error("failed to write snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OceanError>;
