//! Photometric models for light arriving at the working plane

pub mod point_source;

pub use point_source::{irradiance_contribution, CalibrationError, CalibrationProfile};
