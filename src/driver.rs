//! Headless frame loop: simulate, cull, hand off to the renderer, snapshot.

use crate::camera::CameraSystem;
use crate::cli::{Args, BackendKind};
use crate::cpu::CpuBackend;
use crate::error::Result;
use crate::gpu::{GpuBackend, GpuContext};
use crate::ocean::{FftPlan, MeshLibrary};
use crate::params::{SnapshotConfig, Wind};
use crate::pipeline::{OceanPipeline, WaveBackend};
use crate::render::{draw_list, LogRenderer, SurfaceRenderer, TileStats};
use crate::snapshot::{prepare_output_dir, write_snapshot};
use crate::tiles::TileCuller;

/// Totals over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub regenerations: u64,
    /// Tiles drawn over all frames, by level
    pub tiles: TileStats,
    pub snapshots: usize,
}

/// Build the selected backend and run every frame
pub fn run(args: &Args) -> Result<RunSummary> {
    let params = args.ocean_params();
    params.validate()?;
    let tile_params = args.tile_params();
    tile_params.validate()?;
    if let Some((_, wind)) = args.wind_change() {
        wind.validate()?;
    }

    match args.backend {
        BackendKind::Cpu => {
            let backend = CpuBackend::new(params.resolution as usize);
            Simulation::new(backend, args)?.run()
        }
        BackendKind::Gpu => {
            let context = GpuContext::blocking()?;
            let plan = FftPlan::new(params.resolution)?;
            let backend = GpuBackend::new(context, &plan, &args.shader_dir, args.sync)?;
            Simulation::new(backend, args)?.run()
        }
    }
}

/// Everything one run owns
struct Simulation<B: WaveBackend> {
    pipeline: OceanPipeline<B>,
    camera: CameraSystem,
    culler: TileCuller,
    meshes: MeshLibrary,
    renderer: LogRenderer,
    snapshots: Option<SnapshotConfig>,
    wind_change: Option<(usize, Wind)>,
    frames: usize,
    frame_step_s: f32,
}

impl<B: WaveBackend> Simulation<B> {
    fn new(backend: B, args: &Args) -> Result<Self> {
        let params = args.ocean_params();
        let tile_params = args.tile_params();
        let render_config = args.render_config();

        let snapshots = args.snapshot_config();
        if let Some(config) = &snapshots {
            prepare_output_dir(config)?;
            log::info!("Snapshots: {}", config.output_dir.display());
        }

        Ok(Self {
            meshes: MeshLibrary::new(params.resolution as usize, tile_params.tile_length_m),
            pipeline: OceanPipeline::new(backend, params)?,
            camera: CameraSystem::new(args.camera_preset(), render_config.fov_degrees),
            culler: TileCuller::new(tile_params),
            renderer: LogRenderer::new(args.render_toggles()),
            snapshots,
            wind_change: args.wind_change(),
            frames: args.frames,
            frame_step_s: render_config.frame_step_s(),
        })
    }

    fn run(mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for frame in 0..self.frames {
            let time_s = frame as f32 * self.frame_step_s;

            if let Some((change_frame, wind)) = self.wind_change {
                if change_frame == frame {
                    log::info!(
                        "Frame {}: wind changes to {} m/s at {}°",
                        frame,
                        wind.speed_m_per_s,
                        wind.angle_deg
                    );
                    self.pipeline.set_wind(wind);
                }
            }

            let report = self.pipeline.run_frame(time_s);
            let surface = self.pipeline.read_surface()?;

            let viewer = self.camera.viewer_at(time_s);
            let tiles = self.culler.cull(&viewer);
            let commands = draw_list(&tiles, &self.meshes);
            self.renderer
                .draw_frame(frame, &viewer, &commands, &surface);

            let stats = TileStats::from_commands(&commands);
            summary.tiles.high += stats.high;
            summary.tiles.low += stats.low;

            if let Some(config) = &self.snapshots {
                if config.wants_frame(frame, self.frames) {
                    write_snapshot(config, frame, &surface)?;
                    summary.snapshots += 1;
                }
            }

            log::debug!(
                "frame {} at {:.3}s: regenerated {}, {} high / {} low tiles",
                frame,
                report.time_s,
                report.regenerated,
                stats.high,
                stats.low
            );
        }

        summary.frames = self.frames;
        summary.regenerations = self.pipeline.regenerations();
        log::info!(
            "Ran {} frames: {} spectrum regenerations, {} high / {} low tiles drawn, {} snapshots",
            summary.frames,
            summary.regenerations,
            summary.tiles.high,
            summary.tiles.low,
            summary.snapshots
        );
        Ok(summary)
    }
}
