//! Final accept/reject of a design against its constraints.
//!
//! Combines the field statistics with the derived physics: DLI from the
//! photoperiod and, when a climate reading is available, the VPD and
//! humidity-deficit bands.

use serde::{Deserialize, Serialize};
use shared::units::{Dli, PowerDensity, PressureExt, RatioExt};

use super::climate::ClimateAssessment;
use super::daily_light::daily_light_integral;
use super::PhysicsError;
use crate::field::stats::FieldStatistics;
use crate::optimizer::constraints::OptimizationConstraints;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl AcceptanceCheck {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceReport {
    /// DLI delivered by the average PPFD over the photoperiod
    pub dli: Dli,
    pub checks: Vec<AcceptanceCheck>,
    /// True only when every check passed
    pub accepted: bool,
}

impl AcceptanceReport {
    pub fn failures(&self) -> impl Iterator<Item = &AcceptanceCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Evaluate a simulated design against its constraints.
///
/// The DLI check only runs when the constraints carry a DLI target, and the
/// climate check only when an assessment is supplied.
pub fn evaluate_acceptance(
    statistics: &FieldStatistics,
    power_density: PowerDensity,
    constraints: &OptimizationConstraints,
    photoperiod_hours: f64,
    climate: Option<&ClimateAssessment>,
) -> Result<AcceptanceReport, PhysicsError> {
    let dli = daily_light_integral(statistics.average, photoperiod_hours)?;
    let range = &constraints.ppfd_range;
    let mut checks = vec![
        AcceptanceCheck::new(
            "ppfd_range",
            range.contains(statistics.average),
            format!(
                "average {:.1} within [{:.0}, {:.0}]",
                statistics.average,
                range.min.value(),
                range.max.value()
            ),
        ),
        AcceptanceCheck::new(
            "uniformity",
            statistics.uniformity.min_avg >= constraints.min_uniformity,
            format!(
                "min/avg {:.3} against minimum {:.3}",
                statistics.uniformity.min_avg.as_fraction(),
                constraints.min_uniformity.as_fraction()
            ),
        ),
        AcceptanceCheck::new(
            "power_density",
            power_density <= constraints.max_power_density,
            format!(
                "{:.1} against cap {:.1}",
                power_density, constraints.max_power_density
            ),
        ),
    ];

    if let Some(target) = constraints.target_dli {
        checks.push(AcceptanceCheck::new(
            "dli",
            dli >= target,
            format!("{dli:.1} over {photoperiod_hours} h against target {target:.1}"),
        ));
    }

    if let Some(assessment) = climate {
        checks.push(AcceptanceCheck::new(
            "climate",
            assessment.within_targets(),
            format!(
                "VPD {:.2} kPa ({:?}), humidity deficit {:.1} ({:?})",
                assessment.state.vpd.as_kilopascals(),
                assessment.vpd_status,
                assessment.state.humidity_deficit,
                assessment.humidity_deficit_status
            ),
        ));
    }

    let accepted = checks.iter().all(|c| c.passed);
    Ok(AcceptanceReport {
        dli,
        checks,
        accepted,
    })
}
