//! One-call simulation of an existing design at report resolution

use serde::Serialize;
use shared::units::PowerDensity;

use crate::config::SimulationConfig;
use crate::field::grid::SampleGrid;
use crate::field::irradiance::{compute_field, FieldError, IrradianceField};
use crate::field::rating::UniformityRating;
use crate::field::stats::{summarize, FieldStatistics};
use crate::hardware::fixture::Fixture;
use crate::hardware::room::Room;

/// Field and derived figures for one room and fixture set
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    #[serde(skip)]
    pub field: IrradianceField,
    pub statistics: FieldStatistics,
    pub power_density: PowerDensity,
    /// Rating of the min/avg ratio
    pub uniformity_rating: UniformityRating,
    /// Rating of the coefficient of variation
    pub cv_rating: UniformityRating,
}

/// Simulate `fixtures` in `room` on the configured report grid
pub fn simulate_room(
    room: &Room,
    fixtures: &[Fixture],
    config: &SimulationConfig,
) -> Result<SimulationReport, FieldError> {
    let grid = SampleGrid::build(room, config.report_resolution)?;
    let field = compute_field(room, fixtures, &grid, config.working_height, &config.calibration)?;
    let statistics = summarize(&field);
    let (uniformity_rating, cv_rating) = config.rating_bands.rate(&statistics.uniformity);

    Ok(SimulationReport {
        field,
        statistics,
        power_density: room.power_density(fixtures),
        uniformity_rating,
        cv_rating,
    })
}
