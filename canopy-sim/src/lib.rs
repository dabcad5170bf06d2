//! Horticultural lighting simulation and layout optimization
//!
//! This crate estimates how much photosynthetic light reaches a grow room's
//! canopy from a set of fixtures, summarizes how evenly it is spread, derives
//! plant-facing figures (DLI, VPD) and searches fixture grids for a layout
//! that meets a PPFD target.
//!
//! The engine is purely functional: every call takes its room, fixtures and
//! [`SimulationConfig`] by reference and returns fresh values, so independent
//! rooms can be simulated concurrently without coordination.

pub mod config;
pub mod design;
pub mod field;
pub mod hardware;
pub mod optimizer;
pub mod photometry;
pub mod physics;
pub mod report;
pub mod shared_args;

// Re-exports for easier access
pub use config::{ConfigError, SimulationConfig};
pub use design::LightingDesign;
pub use field::{compute_field, summarize, FieldStatistics, IrradianceField, SampleGrid};
pub use hardware::{Fixture, FixtureModel, Room, SurfaceReflectance};
pub use optimizer::{
    optimize_lighting_design, OptimizationConstraints, OptimizationResult, OptimizationSuggestion,
};
pub use photometry::{irradiance_contribution, CalibrationProfile};
pub use physics::{daily_light_integral, evaluate_acceptance, ppfd_for_dli, vapor_state};
pub use report::{simulate_room, SimulationReport};
