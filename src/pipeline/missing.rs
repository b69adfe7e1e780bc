//! Missing value analysis and median imputation

use anyhow::Result;
use polars::prelude::*;

use super::label::LabelSpec;
use super::stats::median;

/// Read a column as `f64` values, treating nulls, NaN and ±inf as missing.
///
/// Cleaning and ranking both read through here, so a non-finite cell is
/// imputed by the cleaner exactly as the ranker would exclude it.
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let col = df.column(column)?.cast(&DataType::Float64)?;
    let values = col
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

/// Number of missing cells in a column of values
pub fn missing_count(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

/// Analyze missing values for every parameter column.
///
/// Returns `(column, missing_ratio)` pairs sorted by ratio descending.
/// The label column is not a parameter and is excluded.
pub fn analyze_missing_values(df: &DataFrame, label: &LabelSpec) -> Result<Vec<(String, f64)>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = Vec::new();

    for col_name in df.get_column_names() {
        if col_name.as_str() == label.column {
            continue;
        }
        let values = numeric_values(df, col_name.as_str())?;
        missing_ratios.push((col_name.to_string(), missing_count(&values) as f64 / rows));
    }

    // Sort by missing ratio descending
    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Names of columns in which every value is missing.
///
/// A column of a zero-row table counts as fully missing.
pub fn find_all_missing_columns(columns: &[(String, Vec<Option<f64>>)]) -> Vec<String> {
    columns
        .iter()
        .filter(|(_, values)| values.iter().all(|v| v.is_none()))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Median of the observed (non-missing) values of a column
pub fn column_median(values: &[Option<f64>]) -> Option<f64> {
    let observed: Vec<f64> = values.iter().flatten().copied().collect();
    median(&observed)
}

/// Replace every missing cell with the median of the observed cells.
///
/// Returns the filled values and the number of cells that were imputed, or
/// `None` when the column has no observed value to take a median from.
pub fn impute_with_median(values: &[Option<f64>]) -> Option<(Vec<f64>, usize)> {
    let fill = column_median(values)?;
    let imputed = missing_count(values);
    let filled = values.iter().map(|v| v.unwrap_or(fill)).collect();
    Some((filled, imputed))
}
