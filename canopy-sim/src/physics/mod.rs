//! Plant-facing quantities derived from light and climate.
//!
//! Daily light integral ties the PPFD pipeline to a photoperiod; vapor
//! pressure deficit and humidity deficit come from air temperature and
//! relative humidity alone. Both feed the acceptance report.

pub mod acceptance;
pub mod climate;
pub mod daily_light;

use thiserror::Error;

pub use acceptance::{evaluate_acceptance, AcceptanceCheck, AcceptanceReport};
pub use climate::{
    assess_climate, vapor_state, BandStatus, ClimateAssessment, ClimateReading, ClimateTargets,
    VaporState,
};
pub use daily_light::{daily_light_integral, photoperiod_for_dli, ppfd_for_dli};

/// Error types for derived physics calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("photoperiod must be within {allowed}, got {hours} h")]
    Photoperiod { hours: f64, allowed: &'static str },
    #[error("relative humidity must be within [0, 100] %, got {0}")]
    RelativeHumidity(f64),
    #[error("temperature must be finite and above -237.3 °C, got {0}")]
    Temperature(f64),
    #[error("{quantity} must be finite and non-negative, got {value}")]
    NegativeQuantity { quantity: &'static str, value: f64 },
}
