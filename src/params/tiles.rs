//! Tiling parameters for the infinite surface.

use crate::error::{OceanError, Result};

/// Layout and level-of-detail rules for the ring of ocean tiles around the viewer
#[derive(Debug, Clone)]
pub struct TileParams {
    /// Side of the square ring of candidate tiles (odd, centered on the viewer's tile)
    pub ring_side: u32,

    /// World-space side length of one tile (meters)
    /// Default: 0.15 × 512 m spectrum domain, the patch is drawn scaled down
    pub tile_length_m: f32,

    /// Height of the undisplaced water plane (meters)
    pub sea_level_m: f32,

    /// Multiplier on the field of view giving the half-angle of the culling cone
    /// 1.4 keeps tiles just outside the frustum to avoid popping at screen edges
    pub fov_multiplier: f32,

    /// Chebyshev tile distance from which tiles use the low-resolution mesh
    pub low_detail_distance: u32,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            ring_side: 5,
            tile_length_m: 0.15 * 512.0,
            sea_level_m: -2.0,
            fov_multiplier: 1.4,
            low_detail_distance: 2,
        }
    }
}

impl TileParams {
    pub fn validate(&self) -> Result<()> {
        if self.ring_side % 2 == 0 {
            return Err(OceanError::InvalidTileRing(self.ring_side));
        }
        if !(self.tile_length_m.is_finite() && self.tile_length_m > 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "tile_length_m",
                value: self.tile_length_m,
                expected: "finite and > 0",
            });
        }
        if !(self.fov_multiplier.is_finite() && self.fov_multiplier > 0.0) {
            return Err(OceanError::InvalidParameter {
                name: "fov_multiplier",
                value: self.fov_multiplier,
                expected: "finite and > 0",
            });
        }
        Ok(())
    }

    /// Largest absolute tile offset in the ring (P / 2)
    pub fn ring_radius(&self) -> i32 {
        (self.ring_side / 2) as i32
    }
}
