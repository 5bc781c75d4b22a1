//! View-dependent selection of ocean tiles around the viewer.
//!
//! The surface is one periodic patch repeated over a square ring of tiles
//! centred on the tile under the viewer. A tile is kept when any of its centre
//! or corners falls inside a widened view cone on the XZ plane, and distant
//! tiles are drawn with the low-resolution mesh.

use glam::{Vec2, Vec3};

use crate::camera::ViewerState;
use crate::params::TileParams;

/// Mesh resolution level of a drawn tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileLod {
    High,
    Low,
}

/// One tile selected for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    /// Tile offset from the viewer's tile
    pub offset: (i32, i32),
    /// World translation of the tile corner: (corner.x, sea level, corner.z)
    pub translation: Vec3,
    pub lod: TileLod,
}

/// Selects visible tiles and their level of detail each frame
#[derive(Debug, Clone)]
pub struct TileCuller {
    params: TileParams,
}

impl TileCuller {
    pub fn new(params: TileParams) -> Self {
        Self { params }
    }

    /// Tile index under a world position
    pub fn viewer_tile(&self, position: Vec3) -> (i32, i32) {
        let length = self.params.tile_length_m;
        (
            (position.x / length).floor() as i32,
            (position.z / length).floor() as i32,
        )
    }

    /// Level of a tile at the given offset from the viewer's tile
    pub fn lod(&self, offset: (i32, i32)) -> TileLod {
        let distance = offset.0.unsigned_abs().max(offset.1.unsigned_abs());
        if distance >= self.params.low_detail_distance {
            TileLod::Low
        } else {
            TileLod::High
        }
    }

    /// Tiles to draw this frame, each candidate at most once
    pub fn cull(&self, viewer: &ViewerState) -> Vec<VisibleTile> {
        let length = self.params.tile_length_m;
        let radius = self.params.ring_radius();
        let (u, v) = self.viewer_tile(viewer.position);

        let eye = Vec2::new(viewer.position.x, viewer.position.z);
        let forward = Vec2::new(viewer.forward.x, viewer.forward.z).normalize_or_zero();
        let half_angle = (viewer.fov_radians * self.params.fov_multiplier).min(std::f32::consts::PI);
        let threshold = half_angle.cos();

        let in_view = |point: Vec2| {
            let direction = point - eye;
            if direction.length_squared() == 0.0 {
                return true;
            }
            direction.normalize().dot(forward) > threshold
        };

        let mut tiles = Vec::new();
        for j in -radius..=radius {
            for i in -radius..=radius {
                let corner = Vec2::new((u + i) as f32, (v + j) as f32) * length;
                let probes = [
                    corner + Vec2::splat(length * 0.5),
                    corner,
                    corner + Vec2::new(length, 0.0),
                    corner + Vec2::new(0.0, length),
                    corner + Vec2::splat(length),
                ];

                if probes.into_iter().any(in_view) {
                    tiles.push(VisibleTile {
                        offset: (i, j),
                        translation: Vec3::new(corner.x, self.params.sea_level_m, corner.y),
                        lod: self.lod((i, j)),
                    });
                }
            }
        }
        tiles
    }
}
