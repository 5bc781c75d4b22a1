//! Spectral ocean simulation: the CPU reference implementation of every
//! wave stage plus the shared field types.

pub mod evolve;
pub mod fft;
pub mod field;
pub mod mesh;
pub mod noise;
pub mod reorder;
pub mod spectrum;
pub mod surface;

pub use evolve::{dispersion, evolve_spectrum, DisplacementSpectra};
pub use fft::{
    run_stage, transform_2d, transform_pass, FftAxis, FftDirection, FftPlan, FftStage, PingPong,
};
pub use field::{mirrored, wavevector, Complex, Grid, SpectralField};
pub use mesh::{MeshHandle, MeshLibrary, PatchMesh, Vertex};
pub use noise::{NoiseField, NoiseGenerator};
pub use reorder::reorder;
pub use spectrum::{generate_initial_spectrum, phillips};
pub use surface::{derive_surface, SpatialFields, SurfaceFields};
