//! Measurement table cleaning
//!
//! Three ordered steps turn a raw table into a fully populated, informative
//! one:
//!
//! 1. drop parameter columns in which every value is missing
//! 2. replace remaining missing cells with the column median of observed values
//! 3. drop columns whose variance over all rows is below an absolute cutoff
//!
//! Medians are only ever computed from observed values, and variances only
//! from imputed columns. The label column passes through unchanged.

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::label::{parameter_columns, validate_labels, LabelSpec};
use super::missing::{find_all_missing_columns, impute_with_median, numeric_values};
use super::variance::{column_variances, find_low_variance_columns, DEFAULT_VARIANCE_THRESHOLD};

/// Settings for the cleaning step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Columns with population variance strictly below this are dropped
    pub variance_threshold: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            variance_threshold: DEFAULT_VARIANCE_THRESHOLD,
        }
    }
}

/// Result of cleaning a measurement table
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Surviving parameters as Float64 columns followed by the label column
    pub table: DataFrame,
    /// Surviving parameter names in table order
    pub surviving: Vec<String>,
    /// Parameters removed because every value was missing
    pub dropped_all_missing: Vec<String>,
    /// Parameters removed by the variance filter, with their variance
    pub dropped_low_variance: Vec<(String, f64)>,
    /// Number of cells filled with a column median
    pub imputed_cells: usize,
    /// Number of parameter columns in the input table
    pub initial_parameters: usize,
}

/// Clean a raw measurement table.
///
/// The label column is validated first; a malformed label aborts before any
/// column is touched. A zero-row table, or one whose parameters are all
/// fully missing, yields a clean table holding only the label column.
pub fn clean_measurements(
    df: &DataFrame,
    label: &LabelSpec,
    config: &CleanerConfig,
) -> Result<CleanOutcome> {
    validate_labels(df, label)?;
    let params = parameter_columns(df, label)?;
    let initial_parameters = params.len();

    let mut raw: Vec<(String, Vec<Option<f64>>)> = Vec::with_capacity(params.len());
    for name in params {
        let values = numeric_values(df, &name)?;
        raw.push((name, values));
    }

    // Step 1: fully missing columns
    let dropped_all_missing = find_all_missing_columns(&raw);
    raw.retain(|(name, _)| !dropped_all_missing.contains(name));

    // Step 2: median imputation over the survivors of step 1
    let mut imputed_cells = 0;
    let mut filled: Vec<(String, Vec<f64>)> = Vec::with_capacity(raw.len());
    for (name, values) in raw {
        if let Some((values, imputed)) = impute_with_median(&values) {
            imputed_cells += imputed;
            filled.push((name, values));
        }
    }

    // Step 3: variance filter on the fully populated columns
    let variances = column_variances(&filled);
    let dropped_low_variance = find_low_variance_columns(&variances, config.variance_threshold);
    filled.retain(|(name, _)| !dropped_low_variance.iter().any(|(dropped, _)| dropped == name));

    let surviving: Vec<String> = filled.iter().map(|(name, _)| name.clone()).collect();

    let mut columns: Vec<Column> = filled
        .into_iter()
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();
    columns.push(df.column(&label.column)?.clone());
    let table = DataFrame::new(columns)?;

    Ok(CleanOutcome {
        table,
        surviving,
        dropped_all_missing,
        dropped_low_variance,
        imputed_cells,
        initial_parameters,
    })
}
