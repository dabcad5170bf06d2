//! Room geometry and surface reflectance.
//!
//! A room is an axis-aligned box with its origin at one floor corner: x runs
//! along `width`, y along `length`, z up to `height`. All three share one
//! length unit chosen by the caller; nothing in the engine converts units.

use serde::{Deserialize, Serialize};
use shared::units::{PowerDensity, PowerExt};
use thiserror::Error;

use super::fixture::Fixture;

/// Weight of wall reflectance in the bulk inter-reflection correction
pub const WALL_REFLECTANCE_WEIGHT: f64 = 0.1;

/// Weight of ceiling reflectance in the bulk inter-reflection correction
pub const CEILING_REFLECTANCE_WEIGHT: f64 = 0.05;

/// Error types for room validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoomError {
    #[error("room {dimension} must be positive and finite, got {value}")]
    InvalidDimension { dimension: &'static str, value: f64 },
    #[error("{surface} reflectance must be within [0, 1], got {value}")]
    InvalidReflectance { surface: &'static str, value: f64 },
}

/// Diffuse reflectance of the room surfaces, each a fraction in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceReflectance {
    pub ceiling: f64,
    pub walls: f64,
    pub floor: f64,
}

impl Default for SurfaceReflectance {
    /// Typical white ceiling, light walls, concrete floor
    fn default() -> Self {
        Self {
            ceiling: 0.8,
            walls: 0.5,
            floor: 0.2,
        }
    }
}

impl SurfaceReflectance {
    pub fn new(ceiling: f64, walls: f64, floor: f64) -> Self {
        Self {
            ceiling,
            walls,
            floor,
        }
    }

    /// Fully absorbing surfaces; the bulk correction becomes exactly 1.0
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Flat multiplier approximating inter-reflected light.
    ///
    /// `1 + walls * 0.1 + ceiling * 0.05`, applied identically to every
    /// sample point regardless of its distance to the walls. Floor
    /// reflectance does not contribute to light arriving on the working plane.
    pub fn bulk_correction(&self) -> f64 {
        1.0 + self.walls * WALL_REFLECTANCE_WEIGHT + self.ceiling * CEILING_REFLECTANCE_WEIGHT
    }

    pub fn validate(&self) -> Result<(), RoomError> {
        for (surface, value) in [
            ("ceiling", self.ceiling),
            ("walls", self.walls),
            ("floor", self.floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RoomError::InvalidReflectance { surface, value });
            }
        }
        Ok(())
    }
}

/// Rectangular grow room.
///
/// Immutable for the duration of a simulation run; the engine only ever
/// borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub width: f64,
    pub length: f64,
    pub height: f64,
    #[serde(default)]
    pub reflectance: SurfaceReflectance,
}

impl Room {
    /// Create a validated room
    pub fn new(
        width: f64,
        length: f64,
        height: f64,
        reflectance: SurfaceReflectance,
    ) -> Result<Self, RoomError> {
        let room = Self {
            width,
            length,
            height,
            reflectance,
        };
        room.validate()?;
        Ok(room)
    }

    /// Reject non-positive or non-finite dimensions and out-of-range reflectance
    pub fn validate(&self) -> Result<(), RoomError> {
        check_dimension("width", self.width, false)?;
        check_dimension("length", self.length, false)?;
        check_dimension("height", self.height, false)?;
        self.reflectance.validate()
    }

    /// Like [`Room::validate`] but tolerates a zero width or length.
    ///
    /// Layout search treats an empty footprint as a design that needs
    /// attention rather than as malformed input.
    pub fn validate_allowing_empty_footprint(&self) -> Result<(), RoomError> {
        check_dimension("width", self.width, true)?;
        check_dimension("length", self.length, true)?;
        check_dimension("height", self.height, false)?;
        self.reflectance.validate()
    }

    pub fn footprint_area(&self) -> f64 {
        self.width * self.length
    }

    pub fn has_empty_footprint(&self) -> bool {
        self.footprint_area() == 0.0
    }

    /// Whether (x, y) lies on the floor footprint, boundary included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.length).contains(&y)
    }

    /// Electrical draw of the fixtures (at their current dimming) per unit floor area.
    ///
    /// Returns zero for an empty footprint rather than dividing by zero.
    pub fn power_density(&self, fixtures: &[Fixture]) -> PowerDensity {
        let area = self.footprint_area();
        if area <= 0.0 {
            return PowerDensity::ZERO;
        }
        let watts: f64 = fixtures
            .iter()
            .map(|f| f.effective_wattage().as_watts())
            .sum();
        PowerDensity::new(watts / area)
    }
}

fn check_dimension(dimension: &'static str, value: f64, allow_zero: bool) -> Result<(), RoomError> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else {
        Err(RoomError::InvalidDimension { dimension, value })
    }
}
