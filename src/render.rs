//! Hand-off from the simulation to a renderer.
//!
//! Each frame the driver turns the visible tiles into `DrawCommand`s (which
//! mesh, where) and passes them with the surface fields to a
//! `SurfaceRenderer`. `LogRenderer` is the headless stand-in.

use glam::{Mat4, Vec4};

use crate::camera::ViewerState;
use crate::ocean::{MeshHandle, MeshLibrary, SurfaceFields};
use crate::params::RenderToggles;
use crate::tiles::{TileLod, VisibleTile};

/// Aspect ratio assumed by the headless renderer
const HEADLESS_ASPECT_RATIO: f32 = 16.0 / 9.0;

/// One tile to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub lod: TileLod,
    /// Tile-local to world transform
    pub model: Mat4,
}

impl DrawCommand {
    pub fn for_tile(tile: &VisibleTile, meshes: &MeshLibrary) -> Self {
        Self {
            mesh: meshes.handle(tile.lod),
            lod: tile.lod,
            model: Mat4::from_translation(tile.translation),
        }
    }
}

/// Draw list for a set of visible tiles
pub fn draw_list(tiles: &[VisibleTile], meshes: &MeshLibrary) -> Vec<DrawCommand> {
    tiles
        .iter()
        .map(|tile| DrawCommand::for_tile(tile, meshes))
        .collect()
}

/// Visible tile counts by level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileStats {
    pub high: usize,
    pub low: usize,
}

impl TileStats {
    pub fn from_commands(commands: &[DrawCommand]) -> Self {
        commands
            .iter()
            .fold(Self::default(), |mut stats, command| {
                match command.lod {
                    TileLod::High => stats.high += 1,
                    TileLod::Low => stats.low += 1,
                }
                stats
            })
    }

    pub fn total(&self) -> usize {
        self.high + self.low
    }
}

/// Consumer of the per-frame draw list
pub trait SurfaceRenderer {
    fn draw_frame(
        &mut self,
        frame: usize,
        viewer: &ViewerState,
        commands: &[DrawCommand],
        surface: &SurfaceFields,
    );
}

/// Renderer that records what it would draw and logs it
pub struct LogRenderer {
    toggles: RenderToggles,
    frames_drawn: usize,
    last_stats: TileStats,
}

impl LogRenderer {
    pub fn new(toggles: RenderToggles) -> Self {
        Self {
            toggles,
            frames_drawn: 0,
            last_stats: TileStats::default(),
        }
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    pub fn last_stats(&self) -> TileStats {
        self.last_stats
    }
}

impl SurfaceRenderer for LogRenderer {
    fn draw_frame(
        &mut self,
        frame: usize,
        viewer: &ViewerState,
        commands: &[DrawCommand],
        surface: &SurfaceFields,
    ) {
        let view_proj = viewer.view_proj(HEADLESS_ASPECT_RATIO);
        // Tiles whose corner lies in front of the viewer (positive clip w)
        let in_front = commands
            .iter()
            .filter(|command| (view_proj * command.model * Vec4::W).w > 0.0)
            .count();

        let (lowest, highest) = surface
            .heights()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
                (lo.min(h), hi.max(h))
            });

        self.last_stats = TileStats::from_commands(commands);
        self.frames_drawn += 1;

        log::debug!(
            "frame {}: {} tiles ({} high, {} low, {} in front), heights [{:.3}, {:.3}] m, fog {} m{}{}",
            frame,
            self.last_stats.total(),
            self.last_stats.high,
            self.last_stats.low,
            in_front,
            lowest,
            highest,
            self.toggles.fog_distance_m,
            if self.toggles.wireframe { ", wireframe" } else { "" },
            if self.toggles.display_axes { ", axes" } else { "" },
        );
    }
}
