//! Dataset overview: size, yield breakdown and missingness

use anyhow::Result;
use console::style;
use polars::prelude::*;
use serde::Serialize;

use super::label::{count_outcomes, parameter_columns, validate_labels, LabelSpec};
use super::missing::{analyze_missing_values, missing_count, numeric_values};

/// Number of worst-covered parameters listed in the overview
const MOST_MISSING_SHOWN: usize = 5;

/// Headline statistics of a measurement table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub parameters: usize,
    pub pass_units: usize,
    pub fail_units: usize,
    /// Missing parameter cells across the whole table
    pub missing_cells: usize,
    /// Parameter cells in the table (rows × parameters)
    pub total_cells: usize,
    /// Parameters with at least one missing value
    pub columns_with_missing: usize,
    /// Parameters with the highest missing ratio, worst first
    pub most_missing: Vec<(String, f64)>,
}

impl DatasetOverview {
    /// Percentage of passing units
    pub fn yield_pct(&self) -> f64 {
        percentage(self.pass_units, self.rows)
    }

    /// Percentage of failing units
    pub fn failure_pct(&self) -> f64 {
        percentage(self.fail_units, self.rows)
    }

    /// Percentage of parameter cells that are missing
    pub fn missing_pct(&self) -> f64 {
        percentage(self.missing_cells, self.total_cells)
    }

    pub fn display(&self) {
        println!("\n    {} Dataset Overview:", style("✧").cyan());
        println!("      Units:      {}", self.rows);
        println!("      Parameters: {}", self.parameters);
        println!(
            "      Passing:    {} ({:.1}%)",
            style(self.pass_units).green(),
            self.yield_pct()
        );
        println!(
            "      Failing:    {} ({:.1}%)",
            style(self.fail_units).red(),
            self.failure_pct()
        );
        println!(
            "      Missing:    {} of {} cells ({:.1}%)",
            style(self.missing_cells).yellow(),
            self.total_cells,
            self.missing_pct()
        );
        println!(
            "      Columns with any missing value: {}",
            self.columns_with_missing
        );
        for (name, ratio) in &self.most_missing {
            println!(
                "        {} {} {}",
                style("•").dim(),
                name,
                style(format!("({:.1}% missing)", ratio * 100.0)).dim()
            );
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Summarize a raw measurement table.
///
/// Validates the label column, so a malformed table fails here before the
/// cleaning step starts.
pub fn dataset_overview(df: &DataFrame, label: &LabelSpec) -> Result<DatasetOverview> {
    let outcomes = validate_labels(df, label)?;
    let (pass_units, fail_units) = count_outcomes(&outcomes);
    let params = parameter_columns(df, label)?;

    let mut missing_cells = 0;
    let mut columns_with_missing = 0;
    for name in &params {
        let missing = missing_count(&numeric_values(df, name)?);
        missing_cells += missing;
        if missing > 0 {
            columns_with_missing += 1;
        }
    }

    let most_missing = analyze_missing_values(df, label)?
        .into_iter()
        .filter(|(_, ratio)| *ratio > 0.0)
        .take(MOST_MISSING_SHOWN)
        .collect();

    Ok(DatasetOverview {
        rows: df.height(),
        parameters: params.len(),
        pass_units,
        fail_units,
        missing_cells,
        total_cells: df.height() * params.len(),
        columns_with_missing,
        most_missing,
    })
}
