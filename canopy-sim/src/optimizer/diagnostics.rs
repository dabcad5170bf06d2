//! Diagnostic battery producing improvement suggestions for a design.
//!
//! Checks run against the caller's current fixtures, independent of whichever
//! layout the search ends up recommending. Each failed check yields one
//! [`OptimizationSuggestion`]; the list is ordered high priority first and,
//! within a priority, in the order the checks run.

use serde::{Deserialize, Serialize};
use shared::units::{PowerExt, RatioExt};
use std::fmt;

use super::constraints::OptimizationConstraints;
use super::layout::fixture_spacing_cv;
use crate::field::stats::FieldStatistics;
use crate::hardware::fixture::Fixture;
use crate::hardware::room::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Placement,
    Power,
    Spectrum,
    Spacing,
    Efficiency,
}

/// Urgency of a suggestion; orders `High < Medium < Low` so sorting puts
/// the most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuggestionKind::Placement => "placement",
            SuggestionKind::Power => "power",
            SuggestionKind::Spectrum => "spectrum",
            SuggestionKind::Spacing => "spacing",
            SuggestionKind::Efficiency => "efficiency",
        };
        f.pad(label)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub kind: SuggestionKind,
    pub priority: Priority,
    pub title: String,
    pub detail: String,
    /// Rough expected gain from acting on the suggestion, 0-100
    pub estimated_improvement_pct: f64,
}

impl OptimizationSuggestion {
    fn new(
        kind: SuggestionKind,
        priority: Priority,
        title: &str,
        detail: String,
        estimated_improvement_pct: f64,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.to_string(),
            detail,
            estimated_improvement_pct: estimated_improvement_pct.clamp(0.0, 100.0),
        }
    }
}

/// Limits used by the non-constraint checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticThresholds {
    /// Nearest-neighbour spacing CV above which spacing is flagged, percent
    pub spacing_cv_limit_pct: f64,
    pub ideal_red_blue_ratio: f64,
    /// Allowed relative deviation from the ideal red:blue ratio, percent
    pub red_blue_tolerance_pct: f64,
    /// Aggregate efficacy below this is flagged, µmol/J
    pub min_efficacy: f64,
    /// A PPFD deficit is high priority below this fraction of the target
    pub deficit_high_fraction: f64,
    /// A uniformity deficit is high priority below this fraction of the minimum
    pub uniformity_high_fraction: f64,
}

impl Default for DiagnosticThresholds {
    fn default() -> Self {
        Self {
            spacing_cv_limit_pct: 20.0,
            ideal_red_blue_ratio: 3.0,
            red_blue_tolerance_pct: 25.0,
            min_efficacy: 2.5,
            deficit_high_fraction: 0.8,
            uniformity_high_fraction: 0.75,
        }
    }
}

/// PPF-weighted red:blue ratio of the emitting fixtures that declare a spectrum
fn aggregate_red_blue(fixtures: &[Fixture]) -> Option<f64> {
    let (red, blue) = fixtures
        .iter()
        .filter_map(|f| f.model.spectrum.map(|s| (s, f.effective_ppf().value())))
        .fold((0.0, 0.0), |(red, blue), (s, ppf)| {
            (red + s.red_fraction * ppf, blue + s.blue_fraction * ppf)
        });
    (blue > 0.0).then(|| red / blue)
}

/// Effective PPF over effective draw for the whole set, µmol/J
fn aggregate_efficacy(fixtures: &[Fixture]) -> Option<f64> {
    let ppf: f64 = fixtures.iter().map(|f| f.effective_ppf().value()).sum();
    let watts: f64 = fixtures.iter().map(|f| f.effective_wattage().as_watts()).sum();
    (watts > 0.0).then(|| ppf / watts)
}

/// Run every check and return the failures, most urgent first.
///
/// `statistics` must describe the field produced by `fixtures` in `room`.
pub fn run_diagnostics(
    room: &Room,
    fixtures: &[Fixture],
    statistics: &FieldStatistics,
    constraints: &OptimizationConstraints,
    thresholds: &DiagnosticThresholds,
) -> Vec<OptimizationSuggestion> {
    let target = constraints.target_ppfd.value();
    let average = statistics.average.value();

    if room.has_empty_footprint() || !fixtures.iter().any(Fixture::is_emitting) {
        return vec![
            OptimizationSuggestion::new(
                SuggestionKind::Placement,
                Priority::High,
                "Add fixtures",
                format!(
                    "No light reaches the canopy; place fixtures over the {:.1} unit² footprint",
                    room.footprint_area()
                ),
                100.0,
            ),
            OptimizationSuggestion::new(
                SuggestionKind::Power,
                Priority::High,
                "Increase intensity",
                format!("Average PPFD is {average:.0} against a target of {target:.0}"),
                100.0,
            ),
        ];
    }

    let mut suggestions = Vec::new();

    let range = &constraints.ppfd_range;
    if statistics.average < range.min {
        let priority = if average < target * thresholds.deficit_high_fraction {
            Priority::High
        } else {
            Priority::Medium
        };
        suggestions.push(OptimizationSuggestion::new(
            SuggestionKind::Power,
            priority,
            "Increase intensity",
            format!(
                "Average PPFD {average:.0} is below the acceptable minimum {:.0}; add fixtures or raise dimming",
                range.min.value()
            ),
            (target - average) / target * 100.0,
        ));
    } else if statistics.average > range.max {
        suggestions.push(OptimizationSuggestion::new(
            SuggestionKind::Efficiency,
            Priority::Medium,
            "Reduce intensity",
            format!(
                "Average PPFD {average:.0} exceeds the acceptable maximum {:.0}; dim or remove fixtures",
                range.max.value()
            ),
            (average - target) / average * 100.0,
        ));
    }

    let min_uniformity = constraints.min_uniformity.as_fraction();
    let uniformity = statistics.uniformity.min_avg.as_fraction();
    if uniformity < min_uniformity {
        let priority = if uniformity < min_uniformity * thresholds.uniformity_high_fraction {
            Priority::High
        } else {
            Priority::Medium
        };
        suggestions.push(OptimizationSuggestion::new(
            SuggestionKind::Placement,
            priority,
            "Improve uniformity",
            format!(
                "Min/avg uniformity {uniformity:.2} is below {min_uniformity:.2}; spread fixtures more evenly or raise them"
            ),
            (min_uniformity - uniformity) / min_uniformity * 100.0,
        ));
    }

    let emitting = fixtures.iter().filter(|f| f.is_emitting()).count();
    let outside = fixtures
        .iter()
        .filter(|f| f.is_emitting() && !room.contains(f.x, f.y))
        .count();
    if outside > 0 {
        suggestions.push(OptimizationSuggestion::new(
            SuggestionKind::Placement,
            Priority::Medium,
            "Move fixtures over the footprint",
            format!(
                "{outside} of {emitting} fixtures hang outside the {} x {} room",
                room.width, room.length
            ),
            outside as f64 / emitting as f64 * 100.0,
        ));
    }

    let density = room.power_density(fixtures);
    let cap = constraints.max_power_density;
    if density > cap {
        suggestions.push(OptimizationSuggestion::new(
            SuggestionKind::Power,
            Priority::High,
            "Reduce power density",
            format!("Installed load {density:.1} exceeds the cap of {cap:.1}"),
            (density - cap) / density * 100.0,
        ));
    }

    let spacing_cv = fixture_spacing_cv(fixtures);
    if spacing_cv > thresholds.spacing_cv_limit_pct {
        suggestions.push(OptimizationSuggestion::new(
            SuggestionKind::Spacing,
            Priority::Medium,
            "Regularise fixture spacing",
            format!(
                "Nearest-neighbour spacing varies by {spacing_cv:.0} % (limit {:.0} %)",
                thresholds.spacing_cv_limit_pct
            ),
            (spacing_cv - thresholds.spacing_cv_limit_pct) / spacing_cv * 100.0,
        ));
    }

    if let Some(ratio) = aggregate_red_blue(fixtures) {
        let ideal = thresholds.ideal_red_blue_ratio;
        let deviation_pct = (ratio - ideal).abs() / ideal * 100.0;
        if deviation_pct > thresholds.red_blue_tolerance_pct {
            suggestions.push(OptimizationSuggestion::new(
                SuggestionKind::Spectrum,
                Priority::Low,
                "Adjust spectrum balance",
                format!("Red:blue ratio is {ratio:.1}:1, ideal is {ideal:.1}:1"),
                deviation_pct - thresholds.red_blue_tolerance_pct,
            ));
        }
    }

    if let Some(efficacy) = aggregate_efficacy(fixtures) {
        if efficacy < thresholds.min_efficacy {
            suggestions.push(OptimizationSuggestion::new(
                SuggestionKind::Efficiency,
                Priority::Low,
                "Upgrade to higher-efficacy fixtures",
                format!(
                    "Fixtures deliver {efficacy:.2} µmol/J, below {:.2} µmol/J",
                    thresholds.min_efficacy
                ),
                (thresholds.min_efficacy - efficacy) / thresholds.min_efficacy * 100.0,
            ));
        }
    }

    suggestions.sort_by_key(|s| s.priority);
    suggestions
}
