//! Statistical helpers for sampled fields and fixture arrangements

/// Arithmetic mean, or 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N), or 0.0 for an empty slice
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation expressed as a percentage: `100 * stddev / mean`.
///
/// Degenerate inputs are not errors here: an empty slice or a zero mean yields
/// 0.0 so callers can report "no spread" without special casing.
///
/// # Arguments
/// * `values` - Sample to measure
///
/// # Returns
/// CV in percent; lower means more uniform
pub fn coefficient_of_variation_pct(values: &[f64]) -> f64 {
    let mu = mean(values);
    if mu == 0.0 {
        return 0.0;
    }
    100.0 * population_std_dev(values) / mu
}
