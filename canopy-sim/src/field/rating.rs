//! Human-readable uniformity labels.
//!
//! Presentation only: nothing in the optimizer or acceptance logic branches
//! on a rating, so the bands can be retuned without touching the numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stats::UniformityMetrics;
use shared::units::RatioExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniformityRating {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl fmt::Display for UniformityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UniformityRating::Excellent => "excellent",
            UniformityRating::Good => "good",
            UniformityRating::Fair => "fair",
            UniformityRating::Poor => "poor",
            UniformityRating::VeryPoor => "very poor",
        };
        f.pad(label)
    }
}

/// Thresholds separating the rating labels, best band first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBands {
    /// Lower bounds of excellent, good, fair, poor for a uniformity ratio
    pub ratio: [f64; 4],
    /// Upper bounds of excellent, good, fair, poor for CV in percent
    pub cv_pct: [f64; 4],
}

impl Default for RatingBands {
    fn default() -> Self {
        Self {
            ratio: [0.90, 0.80, 0.70, 0.60],
            cv_pct: [15.0, 25.0, 35.0, 50.0],
        }
    }
}

const BEST_FIRST: [UniformityRating; 4] = [
    UniformityRating::Excellent,
    UniformityRating::Good,
    UniformityRating::Fair,
    UniformityRating::Poor,
];

impl RatingBands {
    /// Rate a uniformity ratio; higher is better
    pub fn rate_ratio(&self, ratio: f64) -> UniformityRating {
        BEST_FIRST
            .iter()
            .zip(self.ratio)
            .find(|(_, floor)| ratio >= *floor)
            .map_or(UniformityRating::VeryPoor, |(rating, _)| *rating)
    }

    /// Rate a coefficient of variation; lower is better
    pub fn rate_cv(&self, cv_pct: f64) -> UniformityRating {
        BEST_FIRST
            .iter()
            .zip(self.cv_pct)
            .find(|(_, ceiling)| cv_pct <= *ceiling)
            .map_or(UniformityRating::VeryPoor, |(rating, _)| *rating)
    }

    /// Ratings for min/avg and CV, the two figures reports lead with
    pub fn rate(&self, metrics: &UniformityMetrics) -> (UniformityRating, UniformityRating) {
        (
            self.rate_ratio(metrics.min_avg.as_fraction()),
            self.rate_cv(metrics.cv_pct),
        )
    }
}
