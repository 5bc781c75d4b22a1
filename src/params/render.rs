//! Rendering toggles and snapshot configuration.

use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Slider range for fog distance (meters)
pub const FOG_DISTANCE_RANGE: RangeInclusive<f32> = 100.0..=200.0;

/// Toggles consumed only by the rendering collaborator
#[derive(Debug, Clone)]
pub struct RenderToggles {
    /// Draw the world axis frame and debug quads
    pub display_axes: bool,

    /// Overlay a wireframe on each drawn tile
    pub wireframe: bool,

    /// Animate the sun and background color
    pub day_night_cycle: bool,

    /// Distance at which fog fully hides the surface (meters)
    pub fog_distance_m: f32,
}

impl Default for RenderToggles {
    fn default() -> Self {
        Self {
            display_axes: false,
            wireframe: false,
            day_night_cycle: false,
            fog_distance_m: 150.0,
        }
    }
}

/// Viewer projection settings
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Frames per second of the fixed simulation clock
    pub fps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            fps: 60,
        }
    }
}

impl RenderConfig {
    /// Seconds between frames of the fixed clock
    pub fn frame_step_s(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Snapshot configuration (PNG dumps of the surface fields)
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Write a snapshot every this many frames (0 = only the last frame)
    pub every_n_frames: usize,
}

impl SnapshotConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            every_n_frames: 0,
        }
    }

    /// Whether the given frame should be written
    pub fn wants_frame(&self, frame: usize, total_frames: usize) -> bool {
        let last = frame + 1 == total_frames;
        match self.every_n_frames {
            0 => last,
            n => last || frame % n == 0,
        }
    }

    /// Height map path for a frame
    pub fn height_path(&self, frame: usize) -> PathBuf {
        self.output_dir.join(format!("height_{:05}.png", frame))
    }

    /// Normal map path for a frame
    pub fn normal_path(&self, frame: usize) -> PathBuf {
        self.output_dir.join(format!("normal_{:05}.png", frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_last_frame_only_by_default() {
        let config = SnapshotConfig::new("out");
        assert!(!config.wants_frame(0, 10));
        assert!(config.wants_frame(9, 10));
    }

    #[test]
    fn test_snapshot_interval() {
        let config = SnapshotConfig {
            every_n_frames: 4,
            ..SnapshotConfig::new("out")
        };
        let written: Vec<usize> = (0..10).filter(|&f| config.wants_frame(f, 10)).collect();
        assert_eq!(written, vec![0, 4, 8, 9]);
    }

    #[test]
    fn test_snapshot_paths() {
        let config = SnapshotConfig::new("out");
        assert_eq!(config.height_path(3), PathBuf::from("out/height_00003.png"));
        assert_eq!(config.normal_path(12), PathBuf::from("out/normal_00012.png"));
    }
}
