//! Viewer paths standing in for an interactive camera.

use glam::{Mat4, Vec3};

use crate::params::{CameraPreset, CirclingViewer, FixedViewer, FlightPath};

/// Near clipping plane (meters)
const NEAR_PLANE_M: f32 = 0.1;

/// Far clipping plane (meters)
const FAR_PLANE_M: f32 = 1000.0;

/// Viewer pose consumed by the tile culler and the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    /// Vertical field of view (radians)
    pub fov_radians: f32,
}

impl ViewerState {
    /// View-projection matrix; Y stays up (the viewer never rolls)
    pub fn view_proj(&self, aspect_ratio: f32) -> Mat4 {
        let view = Mat4::look_to_rh(self.position, self.forward, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_radians, aspect_ratio, NEAR_PLANE_M, FAR_PLANE_M);
        proj * view
    }
}

/// Viewer moving along a preset path
pub struct CameraSystem {
    preset: CameraPreset,
    fov_radians: f32,
}

impl CameraSystem {
    /// Create new camera system with specified preset
    pub fn new(preset: CameraPreset, fov_degrees: f32) -> Self {
        Self {
            preset,
            fov_radians: fov_degrees.to_radians(),
        }
    }

    /// Viewer pose at the given time
    pub fn viewer_at(&self, time_s: f32) -> ViewerState {
        let (position, forward) = match &self.preset {
            CameraPreset::Fixed(p) => Self::fixed_pose(p),
            CameraPreset::Flight(p) => Self::flight_pose(p, time_s),
            CameraPreset::Circling(p) => Self::circling_pose(p, time_s),
        };
        ViewerState {
            position,
            forward,
            fov_radians: self.fov_radians,
        }
    }

    fn fixed_pose(p: &FixedViewer) -> (Vec3, Vec3) {
        let eye = Vec3::from_array(p.position);
        let forward = (Vec3::from_array(p.target) - eye).normalize_or(Vec3::Z);
        (eye, forward)
    }

    fn flight_pose(p: &FlightPath, time_s: f32) -> (Vec3, Vec3) {
        let heading = p.heading_deg.to_radians();
        let forward = Vec3::new(heading.cos(), 0.0, heading.sin());
        let eye = Vec3::new(0.0, p.altitude_m, 0.0) + forward * p.speed_m_per_s * time_s;
        (eye, forward)
    }

    fn circling_pose(p: &CirclingViewer, time_s: f32) -> (Vec3, Vec3) {
        let angle = p.angular_speed_rad_per_s * time_s;
        let (sin, cos) = angle.sin_cos();
        let eye = Vec3::new(
            p.center[0] + p.radius_m * cos,
            p.altitude_m,
            p.center[1] + p.radius_m * sin,
        );
        // Tangent of the circle, counter-clockwise seen from above
        let forward = Vec3::new(-sin, 0.0, cos);
        (eye, forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_viewer_looks_at_target() {
        let camera = CameraSystem::new(CameraPreset::default(), 50.0);
        let viewer = camera.viewer_at(3.0);
        let defaults = FixedViewer::default();

        assert_eq!(viewer.position, Vec3::from_array(defaults.position));
        let expected = (Vec3::from_array(defaults.target) - viewer.position).normalize();
        assert!((viewer.forward - expected).length() < 1e-6);
        assert!((viewer.fov_radians - 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_flight_moves_along_heading() {
        let params = FlightPath::default();
        let camera = CameraSystem::new(CameraPreset::Flight(params.clone()), 50.0);

        let start = camera.viewer_at(0.0);
        let later = camera.viewer_at(2.0);
        assert_eq!(start.position.y, params.altitude_m);
        assert_eq!(later.position.y, params.altitude_m);

        let travelled = later.position - start.position;
        assert!((travelled.length() - 2.0 * params.speed_m_per_s).abs() < 1e-3);
        // Default heading of 90° flies along +Z
        assert!(travelled.z > 0.0 && travelled.x.abs() < 1e-3);
    }

    #[test]
    fn test_circling_stays_on_radius() {
        let params = CirclingViewer::default();
        let camera = CameraSystem::new(CameraPreset::Circling(params.clone()), 50.0);

        for t in 0..20 {
            let viewer = camera.viewer_at(t as f32 * 1.7);
            let radial = Vec3::new(viewer.position.x, 0.0, viewer.position.z);
            assert!((radial.length() - params.radius_m).abs() < 1e-2);
            // Forward is tangent to the circle
            assert!(radial.normalize().dot(viewer.forward).abs() < 1e-4);
        }
    }

    #[test]
    fn test_view_proj_is_finite() {
        let camera = CameraSystem::new(CameraPreset::default(), 50.0);
        let view_proj = camera.viewer_at(0.0).view_proj(16.0 / 9.0);
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(view_proj.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
