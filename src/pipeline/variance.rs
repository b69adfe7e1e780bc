//! Near-zero-variance filtering

use super::stats::population_variance;

/// Default absolute variance cutoff, in the units of each column
pub const DEFAULT_VARIANCE_THRESHOLD: f64 = 0.01;

/// Compute the population variance of every column.
///
/// Empty columns report a variance of 0.0.
pub fn column_variances(columns: &[(String, Vec<f64>)]) -> Vec<(String, f64)> {
    columns
        .iter()
        .map(|(name, values)| (name.clone(), population_variance(values).unwrap_or(0.0)))
        .collect()
}

/// Select columns whose variance is strictly below the threshold.
///
/// Columns exactly at the threshold are kept; a NaN variance is always selected.
pub fn find_low_variance_columns(variances: &[(String, f64)], threshold: f64) -> Vec<(String, f64)> {
    variances
        .iter()
        .filter(|(_, variance)| variance.is_nan() || *variance < threshold)
        .cloned()
        .collect()
}
