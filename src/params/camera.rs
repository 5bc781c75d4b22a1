//! Viewer path configuration and presets.

/// Straight-line flight at constant altitude
#[derive(Debug, Clone)]
pub struct FlightPath {
    /// Constant altitude (meters)
    pub altitude_m: f32,

    /// Forward speed (meters per second)
    pub speed_m_per_s: f32,

    /// Heading, degrees from +X toward +Z
    pub heading_deg: f32,
}

impl Default for FlightPath {
    fn default() -> Self {
        Self {
            altitude_m: 1.0,
            speed_m_per_s: 8.0, // first-person walking speed over the water
            heading_deg: 90.0,
        }
    }
}

/// Stationary viewer (for debugging)
#[derive(Debug, Clone)]
pub struct FixedViewer {
    /// Viewer position (meters)
    pub position: [f32; 3],

    /// Look-at target (meters)
    pub target: [f32; 3],
}

impl Default for FixedViewer {
    fn default() -> Self {
        Self {
            position: [-3.0, 1.0, -2.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Viewer circling a point while looking along its direction of travel
#[derive(Debug, Clone)]
pub struct CirclingViewer {
    /// Circle center (meters, XZ)
    pub center: [f32; 2],

    /// Circle radius (meters)
    pub radius_m: f32,

    /// Altitude (meters)
    pub altitude_m: f32,

    /// Angular speed (radians per second)
    pub angular_speed_rad_per_s: f32,
}

impl Default for CirclingViewer {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0],
            radius_m: 120.0,
            altitude_m: 5.0,
            angular_speed_rad_per_s: 0.1,
        }
    }
}

/// Viewer preset selection
#[derive(Debug, Clone)]
pub enum CameraPreset {
    /// Stationary viewer looking at a target
    Fixed(FixedViewer),

    /// Straight-line flight crossing tile boundaries
    Flight(FlightPath),

    /// Circle around a point, sweeping the view through every direction
    Circling(CirclingViewer),
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::Fixed(FixedViewer::default())
    }
}
