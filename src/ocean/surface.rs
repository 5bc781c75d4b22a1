//! Displacement and normal fields derived from the spatial-domain spectra.

use glam::Vec3;
use rayon::prelude::*;

use super::field::SpectralField;
use crate::kernels::SurfaceUniforms;

/// Final per-texel surface data, four components per texel (w = 0)
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFields {
    pub resolution: usize,
    /// (Dx, h, Dz, 0) per texel
    pub displacement: Vec<[f32; 4]>,
    /// Unit y-up normal per texel
    pub normals: Vec<[f32; 4]>,
}

impl SurfaceFields {
    pub fn zeroed(resolution: usize) -> Self {
        Self {
            resolution,
            displacement: vec![[0.0; 4]; resolution * resolution],
            normals: vec![[0.0; 4]; resolution * resolution],
        }
    }

    pub fn displacement_at(&self, x: usize, z: usize) -> Vec3 {
        let [dx, h, dz, _] = self.displacement[z * self.resolution + x];
        Vec3::new(dx, h, dz)
    }

    pub fn normal_at(&self, x: usize, z: usize) -> Vec3 {
        let [nx, ny, nz, _] = self.normals[z * self.resolution + x];
        Vec3::new(nx, ny, nz)
    }

    /// Heights only, row-major
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.displacement.iter().map(|d| d[1])
    }
}

/// Spatial-domain displacement components after transform and reorder
pub struct SpatialFields<'a> {
    pub height: &'a SpectralField,
    pub chop_x: &'a SpectralField,
    pub chop_z: &'a SpectralField,
}

/// Fill `out` with displacement (real parts) and normals from periodic
/// central differences of the displaced positions
pub fn derive_surface(params: &SurfaceUniforms, fields: SpatialFields, out: &mut SurfaceFields) {
    let n = params.resolution as usize;
    let texel = params.texel_length;
    let sample = |x: usize, z: usize| {
        Vec3::new(
            fields.chop_x.get(x, z).re,
            fields.height.get(x, z).re,
            fields.chop_z.get(x, z).re,
        )
    };

    out.displacement
        .par_chunks_mut(n)
        .zip(out.normals.par_chunks_mut(n))
        .enumerate()
        .for_each(|(z, (displacement_row, normal_row))| {
            let up = (z + 1) % n;
            let down = (z + n - 1) % n;
            for x in 0..n {
                let right = (x + 1) % n;
                let left = (x + n - 1) % n;

                let d = sample(x, z);
                displacement_row[x] = [d.x, d.y, d.z, 0.0];

                let tangent_x = Vec3::new(2.0 * texel, 0.0, 0.0) + sample(right, z) - sample(left, z);
                let tangent_z = Vec3::new(0.0, 0.0, 2.0 * texel) + sample(x, up) - sample(x, down);
                let normal = tangent_z.cross(tangent_x).normalize_or_zero();
                normal_row[x] = [normal.x, normal.y, normal.z, 0.0];
            }
        });
}
