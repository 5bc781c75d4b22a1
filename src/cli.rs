//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::gpu::SyncMode;
use crate::params::{
    CameraPreset, CirclingViewer, FixedViewer, FlightPath, OceanParams, RenderConfig,
    RenderToggles, SnapshotConfig, TileParams, Wind, FOG_DISTANCE_RANGE,
};

/// Where the wave stages execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// rayon loops on the host
    Cpu,
    /// wgpu compute kernels
    Gpu,
}

/// Viewer path preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CameraKind {
    Fixed,
    Flight,
    Circling,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "swellfield")]
#[command(about = "Headless FFT ocean surface simulator", long_about = None)]
pub struct Args {
    /// Backend running the wave stages
    #[arg(long, value_enum, default_value_t = BackendKind::Cpu)]
    pub backend: BackendKind,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 120)]
    pub frames: usize,

    /// Frames per second of the fixed simulation clock
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// FFT resolution N (power of two)
    #[arg(long, default_value_t = 256)]
    pub resolution: u32,

    /// Side length of the simulated patch (meters)
    #[arg(long, value_name = "METERS", default_value_t = 512.0)]
    pub domain_length: f32,

    /// Phillips spectrum amplitude constant
    #[arg(long, default_value_t = 40.0)]
    pub amplitude: f32,

    /// Wind speed (m/s)
    #[arg(long, default_value_t = 40.0)]
    pub wind_speed: f32,

    /// Wind direction (degrees)
    #[arg(long, default_value_t = 45.0)]
    pub wind_angle: f32,

    /// Horizontal displacement scale
    #[arg(long, default_value_t = 1.5)]
    pub choppiness: f32,

    /// Seed for the gaussian noise stream
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Frame at which the wind switches to --new-wind-speed / --new-wind-angle
    #[arg(long, value_name = "FRAME")]
    pub wind_change_frame: Option<usize>,

    /// Wind speed after the change (m/s)
    #[arg(long, default_value_t = 25.0)]
    pub new_wind_speed: f32,

    /// Wind direction after the change (degrees)
    #[arg(long, default_value_t = 120.0)]
    pub new_wind_angle: f32,

    /// Camera preset
    #[arg(long, value_enum, default_value_t = CameraKind::Fixed)]
    pub camera_preset: CameraKind,

    /// Vertical field of view (degrees)
    #[arg(long, default_value_t = 50.0)]
    pub fov: f32,

    /// Side of the square ring of tiles around the viewer (odd)
    #[arg(long, default_value_t = 5)]
    pub patches: u32,

    /// World-space side length of one tile (meters)
    #[arg(long, value_name = "METERS", default_value_t = 76.8)]
    pub tile_length: f32,

    /// Write height and normal PNGs into this directory
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Snapshot every N frames (0 = last frame only)
    #[arg(long, default_value_t = 0)]
    pub snapshot_every: usize,

    /// Directory holding the WGSL kernels
    #[arg(long, value_name = "DIR", default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))]
    pub shader_dir: PathBuf,

    /// GPU stage synchronisation
    #[arg(long, value_enum, default_value_t = SyncMode::Dependencies)]
    pub sync: SyncMode,

    /// Overlay wireframe on drawn tiles
    #[arg(long)]
    pub wireframe: bool,

    /// Draw the world axes
    #[arg(long)]
    pub display_axes: bool,

    /// Animate the day/night cycle
    #[arg(long)]
    pub day_night_cycle: bool,

    /// Fog distance (meters)
    #[arg(long, default_value_t = 150.0)]
    pub fog_distance: f32,
}

impl Args {
    pub fn ocean_params(&self) -> OceanParams {
        OceanParams {
            resolution: self.resolution,
            domain_length_m: self.domain_length,
            amplitude: self.amplitude,
            wind: Wind::new(self.wind_speed, self.wind_angle).clamped_with_warning(),
            choppiness: self.choppiness,
            noise_seed: self.seed,
            ..Default::default()
        }
    }

    pub fn tile_params(&self) -> TileParams {
        TileParams {
            ring_side: self.patches,
            tile_length_m: self.tile_length,
            ..Default::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            fov_degrees: self.fov,
            fps: self.fps,
        }
    }

    pub fn render_toggles(&self) -> RenderToggles {
        let fog = self
            .fog_distance
            .clamp(*FOG_DISTANCE_RANGE.start(), *FOG_DISTANCE_RANGE.end());
        if fog != self.fog_distance {
            log::warn!(
                "Fog distance {} m outside slider range, clamped to {} m",
                self.fog_distance,
                fog
            );
        }
        RenderToggles {
            display_axes: self.display_axes,
            wireframe: self.wireframe,
            day_night_cycle: self.day_night_cycle,
            fog_distance_m: fog,
        }
    }

    /// Parse camera preset from command-line arguments
    pub fn camera_preset(&self) -> CameraPreset {
        let preset = match self.camera_preset {
            CameraKind::Fixed => CameraPreset::Fixed(FixedViewer::default()),
            CameraKind::Flight => CameraPreset::Flight(FlightPath::default()),
            CameraKind::Circling => CameraPreset::Circling(CirclingViewer::default()),
        };
        log::info!("Camera: {:?}", self.camera_preset);
        preset
    }

    pub fn snapshot_config(&self) -> Option<SnapshotConfig> {
        self.snapshot_dir.as_ref().map(|dir| SnapshotConfig {
            every_n_frames: self.snapshot_every,
            ..SnapshotConfig::new(dir)
        })
    }

    /// Frame and new value of the scripted wind change, clamped like the
    /// initial wind
    pub fn wind_change(&self) -> Option<(usize, Wind)> {
        self.wind_change_frame.map(|frame| {
            let wind = Wind::new(self.new_wind_speed, self.new_wind_angle);
            (frame, wind.clamped_with_warning())
        })
    }
}
