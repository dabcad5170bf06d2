//! Fixture layout search.
//!
//! The search is a sweep, not a general solver: each spacing in the
//! configured sweep produces one centred rectangular grid of fixtures, which is
//! simulated on a coarse sample grid and scored on closeness to the PPFD
//! target and on min/avg uniformity. Candidates averaging below a floor
//! fraction of the target (or over budget) are discarded. The best survivor
//! wins, ties going to the earlier spacing; if nothing survives a fixed
//! fallback spacing is used so a layout is always returned.
//!
//! Independently of the winner, the caller's current fixtures are run through
//! the diagnostic battery to produce improvement suggestions.

pub mod constraints;
pub mod diagnostics;
pub mod layout;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shared::range_arg::RangeArg;
use shared::units::{PowerDensity, RatioExt};
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::field::grid::{GridError, SampleGrid};
use crate::field::irradiance::{compute_field, FieldError};
use crate::field::stats::{summarize, FieldStatistics};
use crate::hardware::fixture::models::LED_BAR_680W;
use crate::hardware::fixture::{Fixture, FixtureError, FixtureModel};
use crate::hardware::room::{Room, RoomError};
use crate::photometry::point_source::CalibrationError;

pub use constraints::{ConstraintError, GoalWeights, OptimizationConstraints, PpfdRange};
pub use diagnostics::{
    run_diagnostics, DiagnosticThresholds, OptimizationSuggestion, Priority, SuggestionKind,
};
pub use layout::{
    fixture_spacing_cv, grid_layout, layout_cost, spacing_candidates, LayoutError,
    MAX_LAYOUT_FIXTURES,
};

/// Error types for layout search. Only malformed input is an error; a search
/// that finds nothing acceptable still succeeds via the fallback layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    #[error("invalid room: {0}")]
    Room(#[from] RoomError),
    #[error("invalid fixture #{index}: {source}")]
    Fixture {
        index: usize,
        #[source]
        source: FixtureError,
    },
    #[error("invalid constraints: {0}")]
    Constraints(#[from] ConstraintError),
    #[error("invalid optimizer policy: {parameter} = {value}")]
    Policy { parameter: &'static str, value: f64 },
    #[error("invalid default fixture model: {0}")]
    DefaultModel(FixtureError),
    #[error("invalid spacing sweep: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid calibration: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("invalid sample grid: {0}")]
    Grid(#[from] GridError),
    #[error("field computation failed: {0}")]
    Field(#[from] FieldError),
}

/// 1.5 to 3.0 room units in quarter steps
pub const DEFAULT_SPACING_SWEEP: RangeArg = RangeArg::from_literals(1.5, 3.0, 0.25, 7);

/// Search policy: the sweep, its acceptance rule and its fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerPolicy {
    /// Fixture spacings to try, in room units
    pub spacing_sweep: RangeArg,
    /// Candidates averaging below this fraction of the target are rejected
    pub acceptance_floor: f64,
    /// Spacing used when every candidate is rejected
    pub fallback_spacing: f64,
    /// Goal weights when the constraints do not carry their own
    pub default_weights: GoalWeights,
    /// Distance below the ceiling for fixtures built from `default_model`
    pub mounting_clearance: f64,
    /// Sample grid resolution used while scoring candidates
    pub coarse_resolution: f64,
    /// Model laid out when the caller supplies no emitting fixture
    pub default_model: FixtureModel,
}

impl Default for OptimizerPolicy {
    fn default() -> Self {
        Self {
            spacing_sweep: DEFAULT_SPACING_SWEEP,
            acceptance_floor: 0.8,
            fallback_spacing: 2.0,
            default_weights: GoalWeights::default(),
            mounting_clearance: 0.3,
            coarse_resolution: 0.5,
            default_model: LED_BAR_680W.clone(),
        }
    }
}

impl OptimizerPolicy {
    pub fn validate(&self) -> Result<(), OptimizeError> {
        let checks = [
            ("acceptance_floor", self.acceptance_floor, self.acceptance_floor >= 0.0),
            ("fallback_spacing", self.fallback_spacing, self.fallback_spacing > 0.0),
            ("mounting_clearance", self.mounting_clearance, self.mounting_clearance >= 0.0),
            ("coarse_resolution", self.coarse_resolution, self.coarse_resolution > 0.0),
        ];
        for (parameter, value, ok) in checks {
            if !(ok && value.is_finite()) {
                return Err(OptimizeError::Policy { parameter, value });
            }
        }
        self.default_weights.validate()?;
        self.default_model
            .validate()
            .map_err(OptimizeError::DefaultModel)?;
        spacing_candidates(&self.spacing_sweep)?;
        Ok(())
    }
}

/// Why a candidate was discarded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    BelowFloor,
    OverBudget,
}

/// Outcome of simulating one candidate spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub spacing: f64,
    pub fixture_count: usize,
    /// Statistics on the coarse search grid
    pub statistics: FieldStatistics,
    pub score: f64,
    pub cost: Option<f64>,
    pub rejection: Option<Rejection>,
}

impl CandidateScore {
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Recommended fixtures
    pub layout: Vec<Fixture>,
    /// Spacing that produced `layout`
    pub spacing: f64,
    /// Statistics of `layout` at the report resolution
    pub statistics: FieldStatistics,
    pub score: f64,
    pub power_density: PowerDensity,
    /// True when no candidate passed and the fallback spacing was used
    pub used_fallback: bool,
    /// Every candidate in sweep order
    pub candidates: Vec<CandidateScore>,
    /// Statistics of the caller's own fixtures at the report resolution
    pub baseline: FieldStatistics,
    pub suggestions: Vec<OptimizationSuggestion>,
}

/// Score in [0, 1]: weighted closeness of the average to the target and
/// min/avg uniformity
pub fn score_statistics(
    statistics: &FieldStatistics,
    constraints: &OptimizationConstraints,
    weights: &GoalWeights,
) -> f64 {
    let target = constraints.target_ppfd.value();
    let average = statistics.average.value();
    let closeness = (1.0 - (average - target).abs() / target).max(0.0);
    let uniformity = statistics.uniformity.min_avg.as_fraction();
    weights.combine(closeness, uniformity)
}

/// Index of the highest-scoring accepted candidate; the earliest wins ties
pub fn select_best(candidates: &[CandidateScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        if !candidate.accepted() {
            continue;
        }
        if best.map_or(true, |b| candidate.score > candidates[b].score) {
            best = Some(index);
        }
    }
    best
}

struct Search<'a> {
    room: &'a Room,
    constraints: &'a OptimizationConstraints,
    config: &'a SimulationConfig,
    weights: GoalWeights,
    template: Fixture,
    grid: SampleGrid,
}

impl Search<'_> {
    fn evaluate(&self, spacing: f64) -> Result<(Vec<Fixture>, CandidateScore), OptimizeError> {
        let layout = grid_layout(self.room, spacing, &self.template)?;
        let field = compute_field(
            self.room,
            &layout,
            &self.grid,
            self.config.working_height,
            &self.config.calibration,
        )?;
        let statistics = summarize(&field);
        let score = score_statistics(&statistics, self.constraints, &self.weights);
        let cost = layout_cost(&layout);

        let floor = self.constraints.target_ppfd * self.config.optimizer.acceptance_floor;
        let over_budget = matches!(
            (self.constraints.budget, cost),
            (Some(budget), Some(cost)) if cost > budget
        );
        let rejection = if statistics.average < floor {
            Some(Rejection::BelowFloor)
        } else if over_budget {
            Some(Rejection::OverBudget)
        } else {
            None
        };

        debug!(
            "Candidate spacing {:.2}: {} fixtures, avg {:.1}, score {:.4}, rejection {:?}",
            spacing,
            layout.len(),
            statistics.average,
            score,
            rejection
        );

        let candidate = CandidateScore {
            spacing,
            fixture_count: layout.len(),
            statistics,
            score,
            cost,
            rejection,
        };
        Ok((layout, candidate))
    }
}

/// Statistics of `fixtures` in `room` at the configured report resolution
fn report_statistics(
    room: &Room,
    fixtures: &[Fixture],
    config: &SimulationConfig,
) -> Result<FieldStatistics, OptimizeError> {
    let grid = SampleGrid::build(room, config.report_resolution)?;
    let field = compute_field(room, fixtures, &grid, config.working_height, &config.calibration)?;
    Ok(summarize(&field))
}

/// Search spacings for the best fixture grid and diagnose the current design.
///
/// Never fails for well-formed input: an empty fixture list lays out the
/// configured default model, a zero-area room returns an empty layout with
/// the add-fixtures suggestions, and a sweep with no acceptable candidate
/// falls back to the fixed spacing.
///
/// # Arguments
/// * `room` - Room to light; width or length may be zero
/// * `fixtures` - The caller's current fixtures; the first emitting one is
///   the template for generated layouts
/// * `constraints` - Targets and limits, never modified
/// * `config` - Calibration, resolutions and search policy
pub fn optimize_lighting_design(
    room: &Room,
    fixtures: &[Fixture],
    constraints: &OptimizationConstraints,
    config: &SimulationConfig,
) -> Result<OptimizationResult, OptimizeError> {
    room.validate_allowing_empty_footprint()?;
    for (index, fixture) in fixtures.iter().enumerate() {
        fixture
            .validate()
            .map_err(|source| OptimizeError::Fixture { index, source })?;
    }
    constraints.validate()?;
    config.calibration.validate()?;
    let policy = &config.optimizer;
    policy.validate()?;

    let weights = constraints.weights.unwrap_or(policy.default_weights);

    if room.has_empty_footprint() {
        warn!("Room has an empty footprint; no layout to search");
        let empty = FieldStatistics::zero(0);
        return Ok(OptimizationResult {
            layout: Vec::new(),
            spacing: policy.fallback_spacing,
            statistics: empty,
            score: 0.0,
            power_density: PowerDensity::ZERO,
            used_fallback: true,
            candidates: Vec::new(),
            baseline: empty,
            suggestions: run_diagnostics(room, fixtures, &empty, constraints, &config.diagnostics),
        });
    }

    let template = match fixtures.iter().find(|f| f.is_emitting()) {
        Some(fixture) => fixture.clone(),
        None => policy
            .default_model
            .place(0.0, 0.0, room.height - policy.mounting_clearance),
    };

    let search = Search {
        room,
        constraints,
        config,
        weights,
        template,
        grid: SampleGrid::build(room, policy.coarse_resolution)?,
    };

    let spacings = spacing_candidates(&policy.spacing_sweep)?;
    let (mut layouts, candidates): (Vec<_>, Vec<_>) = spacings
        .par_iter()
        .map(|&spacing| search.evaluate(spacing))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unzip();

    // Sequential reduction in sweep order keeps ties on the first spacing
    let (layout, spacing, score, used_fallback) = match select_best(&candidates) {
        Some(index) => {
            let candidate = &candidates[index];
            (
                std::mem::take(&mut layouts[index]),
                candidate.spacing,
                candidate.score,
                false,
            )
        }
        None => {
            warn!(
                "No spacing in {} met the acceptance rule; falling back to {:.2}",
                policy.spacing_sweep, policy.fallback_spacing
            );
            let (layout, candidate) = search.evaluate(policy.fallback_spacing)?;
            (layout, candidate.spacing, candidate.score, true)
        }
    };

    let statistics = report_statistics(room, &layout, config)?;
    let power_density = room.power_density(&layout);
    info!(
        "Selected spacing {:.2}: {} fixtures, avg {:.1}, min/avg {:.3}, {:.1}",
        spacing,
        layout.len(),
        statistics.average,
        statistics.uniformity.min_avg.as_fraction(),
        power_density
    );

    let baseline = report_statistics(room, fixtures, config)?;
    let suggestions = run_diagnostics(room, fixtures, &baseline, constraints, &config.diagnostics);

    Ok(OptimizationResult {
        layout,
        spacing,
        statistics,
        score,
        power_density,
        used_fallback,
        candidates,
        baseline,
        suggestions,
    })
}
