//! Scalar summaries of an irradiance field.
//!
//! Degenerate fields are not errors: an empty or all-dark field reports zero
//! for every statistic and every ratio whose denominator would be zero.

use serde::{Deserialize, Serialize};
use shared::algo::SummaryScan;
use shared::units::{Ppfd, Ratio, RatioExt};

use super::irradiance::IrradianceField;

/// How evenly light is spread over the working plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformityMetrics {
    /// min / avg
    pub min_avg: Ratio,
    /// avg / max
    pub avg_max: Ratio,
    /// min / max
    pub min_max: Ratio,
    /// Coefficient of variation, 100 * stddev / avg
    pub cv_pct: f64,
}

impl UniformityMetrics {
    pub fn zero() -> Self {
        Self {
            min_avg: Ratio::from_fraction(0.0),
            avg_max: Ratio::from_fraction(0.0),
            min_max: Ratio::from_fraction(0.0),
            cv_pct: 0.0,
        }
    }
}

/// Summary statistics of one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStatistics {
    pub average: Ppfd,
    pub min: Ppfd,
    pub max: Ppfd,
    /// Population standard deviation
    pub std_dev: Ppfd,
    pub sample_count: usize,
    pub uniformity: UniformityMetrics,
}

impl FieldStatistics {
    /// Statistics of a field with no light (or no samples at all)
    pub fn zero(sample_count: usize) -> Self {
        Self {
            average: Ppfd::ZERO,
            min: Ppfd::ZERO,
            max: Ppfd::ZERO,
            std_dev: Ppfd::ZERO,
            sample_count,
            uniformity: UniformityMetrics::zero(),
        }
    }
}

/// Reduce a field to its statistics
pub fn summarize(field: &IrradianceField) -> FieldStatistics {
    summarize_samples(&field.to_vec())
}

/// Statistics of raw PPFD samples in µmol/m²/s.
///
/// Samples are expected to be finite; a NaN anywhere yields the zero summary.
pub fn summarize_samples(samples: &[f64]) -> FieldStatistics {
    let scan = SummaryScan::new(samples);
    let (Ok((min, max)), Ok(average), Ok(std_dev)) = (scan.min_max(), scan.mean(), scan.std_dev())
    else {
        return FieldStatistics::zero(samples.len());
    };

    let ratio = |num: f64, den: f64| {
        Ratio::from_fraction(if den > 0.0 { num / den } else { 0.0 })
    };
    let cv_pct = if average > 0.0 {
        100.0 * std_dev / average
    } else {
        0.0
    };

    FieldStatistics {
        average: Ppfd::new(average),
        min: Ppfd::new(min),
        max: Ppfd::new(max),
        std_dev: Ppfd::new(std_dev),
        sample_count: samples.len(),
        uniformity: UniformityMetrics {
            min_avg: ratio(min, average),
            avg_max: ratio(average, max),
            min_max: ratio(min, max),
            cv_pct,
        },
    }
}
