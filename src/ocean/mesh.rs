//! Flat patch meshes drawn once per visible tile.
//!
//! The vertex shader of the rendering collaborator offsets each vertex by the
//! displacement texel its UV addresses, so the meshes themselves never change.

use bytemuck::{Pod, Zeroable};

use crate::tiles::TileLod;

/// Vertex data for a patch mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Square grid spanning one tile, corner at the local origin
#[derive(Debug, Clone)]
pub struct PatchMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    quads_per_side: usize,
}

impl PatchMesh {
    /// Create a patch of `quads_per_side`² quads covering `tile_length_m`
    pub fn new(quads_per_side: usize, tile_length_m: f32) -> Self {
        let spacing = tile_length_m / quads_per_side as f32;
        let side = quads_per_side + 1;

        let mut vertices = Vec::with_capacity(side * side);
        for z in 0..side {
            for x in 0..side {
                vertices.push(Vertex {
                    position: [x as f32 * spacing, 0.0, z as f32 * spacing],
                    uv: [
                        x as f32 / quads_per_side as f32,
                        z as f32 / quads_per_side as f32,
                    ],
                });
            }
        }

        // Counter-clockwise winding seen from above
        let mut indices = Vec::with_capacity(quads_per_side * quads_per_side * 6);
        for z in 0..quads_per_side {
            for x in 0..quads_per_side {
                let top_left = (z * side + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * side + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self {
            vertices,
            indices,
            quads_per_side,
        }
    }

    pub fn quads_per_side(&self) -> usize {
        self.quads_per_side
    }
}

/// Opaque reference to a mesh owned by a `MeshLibrary`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

/// The two patch meshes, selected by detail level
#[derive(Debug, Clone)]
pub struct MeshLibrary {
    meshes: [PatchMesh; 2],
}

impl MeshLibrary {
    /// High detail uses one quad per field texel, low detail one per two
    pub fn new(resolution: usize, tile_length_m: f32) -> Self {
        Self {
            meshes: [
                PatchMesh::new(resolution, tile_length_m),
                PatchMesh::new((resolution / 2).max(1), tile_length_m),
            ],
        }
    }

    pub fn handle(&self, lod: TileLod) -> MeshHandle {
        match lod {
            TileLod::High => MeshHandle(0),
            TileLod::Low => MeshHandle(1),
        }
    }

    pub fn get(&self, handle: MeshHandle) -> &PatchMesh {
        &self.meshes[handle.0]
    }
}
