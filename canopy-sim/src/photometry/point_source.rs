//! Point-source irradiance model with angular beam falloff.
//!
//! Each fixture is treated as a point emitter radiating its PPF over a sphere,
//! shaped by a beam profile: cosine falloff inside the beam half-angle, then a
//! linear ramp down to zero across a fixed band beyond it. This is a coarse
//! approximation of a real luminous intensity distribution, not an IES
//! photometric web.
//!
//! The absolute scale is set by [`CalibrationProfile::unit_conversion`]. Every
//! PPFD value downstream depends on it, so it is carried as an explicit value
//! rather than a global and should only change together with a recalibration.

use serde::{Deserialize, Serialize};
use shared::units::Ppfd;
use std::f64::consts::PI;
use thiserror::Error;

use crate::hardware::fixture::Fixture;

/// Error types for calibration profile validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("{parameter} must be positive and finite, got {value}")]
    NonPositive { parameter: &'static str, value: f64 },
}

/// Constants that fix the absolute scale and shape of the point-source model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Multiplier reconciling PPF spread over a full sphere with PPFD under
    /// the assumed beam distribution
    pub unit_conversion: f64,
    /// Distance below which a sample point is treated as coincident with the fixture
    pub near_field_distance: f64,
    /// Width of the linear falloff band outside the beam half-angle, in degrees
    pub falloff_band_deg: f64,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            unit_conversion: 4.0,
            near_field_distance: 0.1,
            falloff_band_deg: 30.0,
        }
    }
}

impl CalibrationProfile {
    pub fn validate(&self) -> Result<(), CalibrationError> {
        for (parameter, value) in [
            ("unit_conversion", self.unit_conversion),
            ("near_field_distance", self.near_field_distance),
            ("falloff_band_deg", self.falloff_band_deg),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalibrationError::NonPositive { parameter, value });
            }
        }
        Ok(())
    }
}

/// Relative intensity of a beam at `angle_deg` off its axis.
///
/// Returns `cos(angle)` inside the half-angle. Past the edge the value at the
/// edge ramps linearly to zero over `band_deg`. Never negative.
pub fn angular_attenuation(angle_deg: f64, half_angle_deg: f64, band_deg: f64) -> f64 {
    let factor = if angle_deg <= half_angle_deg {
        angle_deg.to_radians().cos()
    } else {
        let edge = half_angle_deg.to_radians().cos();
        edge * (1.0 - (angle_deg - half_angle_deg) / band_deg)
    };
    factor.max(0.0)
}

/// PPFD contributed by one fixture at the point (x, y) on the plane z = `plane_z`.
///
/// Disabled or fully dimmed fixtures contribute nothing. Points closer than
/// the near-field distance get the clamped value `ppf / near_field_distance`
/// instead of an inverse-square blow-up.
///
/// # Arguments
/// * `fixture` - Emitting fixture
/// * `x`, `y` - Sample position on the working plane
/// * `plane_z` - Height of the working plane
/// * `calibration` - Scale and shape constants of the model
pub fn irradiance_contribution(
    fixture: &Fixture,
    x: f64,
    y: f64,
    plane_z: f64,
    calibration: &CalibrationProfile,
) -> Ppfd {
    let ppf = fixture.effective_ppf().value();
    if ppf <= 0.0 {
        return Ppfd::ZERO;
    }

    let dx = x - fixture.x;
    let dy = y - fixture.y;
    let dz = fixture.z - plane_z;
    let horizontal = dx.hypot(dy);
    let distance = horizontal.hypot(dz);

    if distance < calibration.near_field_distance {
        return Ppfd::new(ppf / calibration.near_field_distance);
    }

    // Angle from the downward axis; points above the fixture land past 90°
    let angle_deg = horizontal.atan2(dz).to_degrees();
    let factor = angular_attenuation(
        angle_deg,
        fixture.model.beam_half_angle_deg,
        calibration.falloff_band_deg,
    );

    let value = ppf / (4.0 * PI * distance * distance) * factor * calibration.unit_conversion;
    Ppfd::new(value.max(0.0))
}
