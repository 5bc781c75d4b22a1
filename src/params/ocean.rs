//! Ocean simulation parameters and the slider ranges exposed to a UI.

use std::ops::RangeInclusive;

use glam::Vec2;

use crate::error::{OceanError, Result};

/// Default FFT resolution (samples per side). Must be a power of two.
pub const DEFAULT_RESOLUTION: u32 = 256;

/// Standard gravity (m/s²) used by the spectrum and the dispersion relation
pub const GRAVITY_M_PER_S2: f32 = 9.81;

/// Slider range for wind magnitude (m/s)
pub const WIND_SPEED_RANGE: RangeInclusive<f32> = 20.0..=60.0;

/// Slider range for wind angle (degrees)
pub const WIND_ANGLE_RANGE: RangeInclusive<f32> = 0.0..=359.0;

/// Slider range for choppiness (dimensionless)
pub const CHOPPINESS_RANGE: RangeInclusive<f32> = 0.0..=3.0;

/// Wind driving the spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    /// Wind magnitude (m/s), never negative
    pub speed_m_per_s: f32,

    /// Direction the wind blows toward, degrees in [0, 360)
    pub angle_deg: f32,
}

impl Wind {
    pub fn new(speed_m_per_s: f32, angle_deg: f32) -> Self {
        // rem_euclid rounds tiny negative angles up to exactly 360
        let angle_deg = match angle_deg.rem_euclid(360.0) {
            wrapped if wrapped >= 360.0 => 0.0,
            wrapped => wrapped,
        };
        Self {
            speed_m_per_s,
            angle_deg,
        }
    }

    /// Reject non-finite or negative speed and angles outside [0, 360)
    pub fn validate(&self) -> Result<()> {
        check_finite_at_least("wind.speed_m_per_s", self.speed_m_per_s, 0.0)?;
        if !self.angle_deg.is_finite() || !(0.0..360.0).contains(&self.angle_deg) {
            return Err(OceanError::InvalidParameter {
                name: "wind.angle_deg",
                value: self.angle_deg,
                expected: "[0, 360)",
            });
        }
        Ok(())
    }

    /// Wind as an XZ vector (magnitude × direction)
    pub fn vector(&self) -> Vec2 {
        let angle = self.angle_deg.to_radians();
        Vec2::new(angle.cos(), angle.sin()) * self.speed_m_per_s
    }

    /// Same wind with its values clamped to the UI slider ranges
    pub fn clamped_to_sliders(&self) -> Self {
        Self::new(
            self.speed_m_per_s
                .clamp(*WIND_SPEED_RANGE.start(), *WIND_SPEED_RANGE.end()),
            self.angle_deg
                .clamp(*WIND_ANGLE_RANGE.start(), *WIND_ANGLE_RANGE.end()),
        )
    }

    /// `clamped_to_sliders`, warning when a value had to move
    pub fn clamped_with_warning(&self) -> Self {
        let clamped = self.clamped_to_sliders();
        if clamped != *self {
            log::warn!(
                "Wind ({} m/s, {}°) outside slider range, clamped to ({} m/s, {}°)",
                self.speed_m_per_s,
                self.angle_deg,
                clamped.speed_m_per_s,
                clamped.angle_deg
            );
        }
        clamped
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::new(40.0, 45.0)
    }
}

/// Simulation parameters for the spectral ocean
#[derive(Debug, Clone)]
pub struct OceanParams {
    /// FFT resolution N (samples per side, power of two, fixed for the session)
    pub resolution: u32,

    /// Physical side length of the simulated patch (meters)
    pub domain_length_m: f32,

    /// Phillips spectrum amplitude constant A
    pub amplitude: f32,

    /// Wind magnitude and direction
    pub wind: Wind,

    /// Horizontal displacement scale χ (0 = rolling swell, 3 = very sharp crests)
    pub choppiness: f32,

    /// Gravity (m/s²)
    pub gravity_m_per_s2: f32,

    /// Seed for the gaussian noise stream
    pub noise_seed: u64,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            domain_length_m: 512.0,
            amplitude: 40.0,
            wind: Wind::default(),
            choppiness: 1.5,
            gravity_m_per_s2: GRAVITY_M_PER_S2,
            noise_seed: 42,
        }
    }
}

impl OceanParams {
    /// Check every invariant the pipeline relies on.
    ///
    /// Called once at startup; a failure here is a fatal configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 || !self.resolution.is_power_of_two() {
            return Err(OceanError::InvalidResolution(self.resolution));
        }
        check_finite_at_least("domain_length_m", self.domain_length_m, f32::MIN_POSITIVE)?;
        check_finite_at_least("amplitude", self.amplitude, 0.0)?;
        self.wind.validate()?;
        check_finite_at_least("choppiness", self.choppiness, 0.0)?;
        check_finite_at_least("gravity_m_per_s2", self.gravity_m_per_s2, f32::MIN_POSITIVE)?;
        Ok(())
    }

    /// Spacing between neighbouring samples of the spatial fields (meters)
    pub fn texel_length_m(&self) -> f32 {
        self.domain_length_m / self.resolution as f32
    }
}

fn check_finite_at_least(name: &'static str, value: f32, min: f32) -> Result<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(OceanError::InvalidParameter {
            name,
            value,
            expected: if min > 0.0 { "finite and > 0" } else { "finite and >= 0" },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(OceanParams::default().validate().is_ok());
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        let params = OceanParams {
            resolution: 300,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(OceanError::InvalidResolution(300))
        ));
    }

    #[test]
    fn test_negative_wind_rejected() {
        let params = OceanParams {
            wind: Wind::new(-1.0, 0.0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_wind_is_valid() {
        let params = OceanParams {
            wind: Wind::new(0.0, 0.0),
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_wind_angle_wraps() {
        assert_eq!(Wind::new(10.0, 370.0).angle_deg, 10.0);
        assert_eq!(Wind::new(10.0, -90.0).angle_deg, 270.0);
    }

    #[test]
    fn test_tiny_negative_angle_wraps_to_zero() {
        let wind = Wind::new(40.0, -1e-8);
        assert_eq!(wind.angle_deg, 0.0);
        assert!(wind.validate().is_ok());
    }

    #[test]
    fn test_non_finite_wind_rejected() {
        assert!(Wind::new(f32::NAN, 45.0).validate().is_err());
        assert!(Wind::new(40.0, f32::INFINITY).validate().is_err());
        assert!(Wind::new(f32::NAN, 45.0).clamped_to_sliders().validate().is_err());
    }

    #[test]
    fn test_wind_vector_points_along_angle() {
        let v = Wind::new(40.0, 90.0).vector();
        assert!(v.x.abs() < 1e-4);
        assert!((v.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_slider_clamping() {
        let wind = Wind::new(100.0, 359.5).clamped_to_sliders();
        assert_eq!(wind.speed_m_per_s, 60.0);
        assert_eq!(wind.angle_deg, 359.0);
    }
}
