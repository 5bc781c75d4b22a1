//! Swellfield - headless FFT ocean surface simulator
//!
//! Evolves a wind-driven wave spectrum, transforms it to a tiling
//! displacement and normal field each frame, and selects the ring of tiles
//! the viewer can see.

use std::process::ExitCode;

use clap::Parser;

use swellfield::cli::Args;
use swellfield::driver;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!(
        "Swellfield: {:?} backend, N = {}, {} frames",
        args.backend,
        args.resolution,
        args.frames
    );

    match driver::run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
