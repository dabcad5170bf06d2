//! Caller-supplied targets and limits for a layout search

use serde::{Deserialize, Serialize};
use shared::units::{Dli, PowerDensity, Ppfd, Ratio, RatioExt};
use thiserror::Error;

/// Error types for constraint validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("target PPFD must be positive and finite, got {0}")]
    TargetPpfd(f64),
    #[error("PPFD range [{min}, {max}] is empty or not finite")]
    PpfdRange { min: f64, max: f64 },
    #[error("minimum uniformity must be within [0, 1], got {0}")]
    MinUniformity(f64),
    #[error("maximum power density must be positive, got {0}")]
    MaxPowerDensity(f64),
    #[error("budget must be finite and non-negative, got {0}")]
    Budget(f64),
    #[error("target DLI must be positive and finite, got {0}")]
    TargetDli(f64),
    #[error("goal weights must be non-negative and not both zero, got ({ppfd}, {uniformity})")]
    Weights { ppfd: f64, uniformity: f64 },
}

/// Acceptable band for the average PPFD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PpfdRange {
    pub min: Ppfd,
    pub max: Ppfd,
}

impl PpfdRange {
    pub fn contains(&self, ppfd: Ppfd) -> bool {
        ppfd >= self.min && ppfd <= self.max
    }
}

/// Relative importance of hitting the PPFD target versus even coverage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalWeights {
    pub ppfd: f64,
    pub uniformity: f64,
}

impl Default for GoalWeights {
    fn default() -> Self {
        Self {
            ppfd: 0.7,
            uniformity: 0.3,
        }
    }
}

impl GoalWeights {
    pub fn validate(&self) -> Result<(), ConstraintError> {
        let finite_non_negative = |w: f64| w.is_finite() && w >= 0.0;
        if finite_non_negative(self.ppfd)
            && finite_non_negative(self.uniformity)
            && self.ppfd + self.uniformity > 0.0
        {
            Ok(())
        } else {
            Err(ConstraintError::Weights {
                ppfd: self.ppfd,
                uniformity: self.uniformity,
            })
        }
    }

    /// Weighted mean of the two goal scores, each expected in [0, 1]
    pub fn combine(&self, ppfd_score: f64, uniformity_score: f64) -> f64 {
        (self.ppfd * ppfd_score + self.uniformity * uniformity_score) / (self.ppfd + self.uniformity)
    }
}

/// Targets a layout should meet. Read-only to the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConstraints {
    pub target_ppfd: Ppfd,
    pub ppfd_range: PpfdRange,
    /// Minimum acceptable min/avg uniformity
    pub min_uniformity: Ratio,
    /// Installed power cap per unit floor area
    pub max_power_density: PowerDensity,
    /// Spending cap for fixtures, same currency as `FixtureModel::unit_cost`
    #[serde(default)]
    pub budget: Option<f64>,
    /// Overrides the configured default goal weights
    #[serde(default)]
    pub weights: Option<GoalWeights>,
    #[serde(default)]
    pub target_dli: Option<Dli>,
}

impl OptimizationConstraints {
    /// Constraints built around a PPFD target: ±20 % band, 0.7 uniformity,
    /// and a 650 W per unit² power cap (a dense flowering room in metres)
    pub fn for_target(target_ppfd: Ppfd) -> Self {
        Self {
            target_ppfd,
            ppfd_range: PpfdRange {
                min: target_ppfd * 0.8,
                max: target_ppfd * 1.2,
            },
            min_uniformity: Ratio::from_fraction(0.7),
            max_power_density: PowerDensity::new(650.0),
            budget: None,
            weights: None,
            target_dli: None,
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_weights(mut self, weights: GoalWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_target_dli(mut self, dli: Dli) -> Self {
        self.target_dli = Some(dli);
        self
    }

    pub fn validate(&self) -> Result<(), ConstraintError> {
        let target = self.target_ppfd.value();
        if !(target.is_finite() && target > 0.0) {
            return Err(ConstraintError::TargetPpfd(target));
        }

        let (min, max) = (self.ppfd_range.min.value(), self.ppfd_range.max.value());
        if !(min.is_finite() && max.is_finite() && min >= 0.0 && min <= max) {
            return Err(ConstraintError::PpfdRange { min, max });
        }

        let uniformity = self.min_uniformity.as_fraction();
        if !(0.0..=1.0).contains(&uniformity) {
            return Err(ConstraintError::MinUniformity(uniformity));
        }

        let density = self.max_power_density.value();
        if density.is_nan() || density <= 0.0 {
            return Err(ConstraintError::MaxPowerDensity(density));
        }

        if let Some(budget) = self.budget {
            if !(budget.is_finite() && budget >= 0.0) {
                return Err(ConstraintError::Budget(budget));
            }
        }

        if let Some(dli) = self.target_dli {
            if !(dli.is_finite() && dli.value() > 0.0) {
                return Err(ConstraintError::TargetDli(dli.value()));
            }
        }

        if let Some(weights) = &self.weights {
            weights.validate()?;
        }
        Ok(())
    }
}
