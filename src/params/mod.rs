//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (meters, seconds, degrees)
//! - Documented ranges and meanings
//! - Startup validation for the invariants the pipeline relies on

mod camera;
mod ocean;
mod render;
mod tiles;

// Re-export all types
pub use camera::{CameraPreset, CirclingViewer, FixedViewer, FlightPath};
pub use ocean::{
    OceanParams, Wind, CHOPPINESS_RANGE, DEFAULT_RESOLUTION, GRAVITY_M_PER_S2,
    WIND_ANGLE_RANGE, WIND_SPEED_RANGE,
};
pub use render::{RenderConfig, RenderToggles, SnapshotConfig, FOG_DISTANCE_RANGE};
pub use tiles::TileParams;
