//! Flat CSV exports for dashboard tools
//!
//! Three tables are produced from the clean table and the ranked report:
//! a yield summary for KPI cards, a pass/fail mean comparison for the top
//! parameters, and unit-level readings of the strongest parameters.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::{count_outcomes, validate_labels, LabelSpec, SignificanceReport};

/// Parameters included in the unit-level export
pub const UNIT_LEVEL_PARAMETERS: usize = 5;

/// File names written by [`export_dashboard_tables`]
pub const YIELD_SUMMARY_FILE: &str = "dashboard_yield_summary.csv";
pub const PARAM_COMPARISON_FILE: &str = "dashboard_param_comparison.csv";
pub const UNIT_LEVEL_FILE: &str = "dashboard_unit_level.csv";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Overall pass/fail counts and rates as `metric,value` rows
pub fn yield_summary(clean: &DataFrame, label: &LabelSpec) -> Result<DataFrame> {
    let outcomes = validate_labels(clean, label)?;
    let (pass, fail) = count_outcomes(&outcomes);
    let total = outcomes.len();
    let rate = |n: usize| {
        if total == 0 {
            0.0
        } else {
            round2(n as f64 / total as f64 * 100.0)
        }
    };

    let df = df! {
        "metric" => ["Total Units", "Passing Units", "Failing Units", "Yield Rate (%)", "Failure Rate (%)"],
        "value" => [total as f64, pass as f64, fail as f64, rate(pass), rate(fail)],
    }?;
    Ok(df)
}

/// One Pass row and one Fail row per top-`k` parameter with its mean and p-value
pub fn parameter_comparison(report: &SignificanceReport, k: usize) -> Result<DataFrame> {
    let top = report.top(k);
    let mut parameters = Vec::with_capacity(top.len() * 2);
    let mut groups = Vec::with_capacity(top.len() * 2);
    let mut means = Vec::with_capacity(top.len() * 2);
    let mut p_values = Vec::with_capacity(top.len() * 2);

    for record in top {
        for (group, mean) in [("Pass", record.pass_mean), ("Fail", record.fail_mean)] {
            parameters.push(record.parameter.as_str());
            groups.push(group);
            means.push(mean);
            p_values.push(record.p_value);
        }
    }

    let df = DataFrame::new(vec![
        Column::new("parameter".into(), parameters),
        Column::new("group".into(), groups),
        Column::new("mean_value".into(), means),
        Column::new("p_value".into(), p_values),
    ])?;
    Ok(df)
}

/// Unit-level readings of the strongest parameters with outcome and a 1-based unit id
pub fn unit_level(clean: &DataFrame, label: &LabelSpec, report: &SignificanceReport) -> Result<DataFrame> {
    let outcomes = validate_labels(clean, label)?;

    let mut columns: Vec<Column> = Vec::with_capacity(UNIT_LEVEL_PARAMETERS + 2);
    for record in report.top(UNIT_LEVEL_PARAMETERS) {
        let col = clean
            .column(&record.parameter)
            .with_context(|| format!("Parameter '{}' missing from clean table", record.parameter))?;
        columns.push(col.clone());
    }

    let outcome_names: Vec<String> = outcomes.iter().map(|o| o.to_string()).collect();
    let unit_ids: Vec<u32> = (1..=outcomes.len() as u32).collect();
    columns.push(Column::new("outcome".into(), outcome_names));
    columns.push(Column::new("unit_id".into(), unit_ids));

    Ok(DataFrame::new(columns)?)
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

/// Write all dashboard tables into `output_dir` and return their paths
pub fn export_dashboard_tables(
    clean: &DataFrame,
    label: &LabelSpec,
    report: &SignificanceReport,
    top_k: usize,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let summary_path = output_dir.join(YIELD_SUMMARY_FILE);
    write_csv(&mut yield_summary(clean, label)?, &summary_path)?;

    let comparison_path = output_dir.join(PARAM_COMPARISON_FILE);
    write_csv(&mut parameter_comparison(report, top_k)?, &comparison_path)?;

    let units_path = output_dir.join(UNIT_LEVEL_FILE);
    write_csv(&mut unit_level(clean, label, report)?, &units_path)?;

    Ok(vec![summary_path, comparison_path, units_path])
}
