//! Swellfield library - FFT ocean surface simulation

pub mod camera;
pub mod cli;
pub mod cpu;
pub mod driver;
pub mod error;
pub mod gpu;
pub mod kernels;
pub mod ocean;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod tiles;
