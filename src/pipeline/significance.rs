//! Per-parameter pass/fail significance ranking
//!
//! Every parameter is split into its pass and fail subsets, tested with
//! Welch's unequal-variance t-test, and described with rounded means,
//! standard deviations and effect sizes. Records are sorted by ascending
//! p-value so the parameters that best separate failing units come first.

use anyhow::Result;
use indicatif::ProgressBar;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::label::{count_outcomes, parameter_columns, validate_labels, LabelSpec, Outcome};
use super::missing::numeric_values;
use super::stats::{mean, round_to, sample_std, serialize_non_finite, welch_t_test};

/// Minimum observations per class before a parameter is tested
pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// Added to |pass_mean| when normalizing the percent difference
pub const PCT_DIFF_EPSILON: f64 = 1e-9;

/// Conventional significance level for reporting
pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Number of parameters shown in the top-K view
pub const DEFAULT_TOP_K: usize = 20;

/// Decimal places for means, standard deviations and mean differences
const STAT_DECIMALS: i32 = 4;

/// Decimal places for the percent difference
const PCT_DECIMALS: i32 = 2;

/// Settings for the ranking step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Parameters with fewer observations in either class are skipped
    pub min_samples: usize,
    /// Denominator guard for the percent difference
    pub epsilon: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            min_samples: DEFAULT_MIN_SAMPLES,
            epsilon: PCT_DIFF_EPSILON,
        }
    }
}

/// Test result and descriptive statistics for one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificanceRecord {
    /// Dense 1-based position in the sorted report
    pub rank: usize,
    pub parameter: String,
    /// Two-sided Welch p-value; 0.0 or 1.0 when both classes are constant
    pub p_value: f64,
    /// (fail_mean - pass_mean) / standard error; `"inf"` / `"-inf"` in JSON
    /// when both classes are constant and differ
    #[serde(serialize_with = "serialize_non_finite")]
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom, absent when both classes are constant
    pub degrees_of_freedom: Option<f64>,
    pub pass_count: usize,
    pub fail_count: usize,
    pub pass_mean: f64,
    pub fail_mean: f64,
    pub pass_std: f64,
    pub fail_std: f64,
    /// fail_mean - pass_mean
    pub mean_diff: f64,
    /// mean_diff as a percentage of |pass_mean|
    pub pct_diff: f64,
}

/// Ranked significance results for all testable parameters
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignificanceReport {
    /// Records sorted by ascending p-value
    pub records: Vec<SignificanceRecord>,
    /// Parameters skipped for having too few observations in a class
    pub skipped: Vec<String>,
    /// Number of passing units in the input table
    pub pass_units: usize,
    /// Number of failing units in the input table
    pub fail_units: usize,
}

impl SignificanceReport {
    /// The `k` most significant records
    pub fn top(&self, k: usize) -> &[SignificanceRecord] {
        &self.records[..k.min(self.records.len())]
    }

    /// Number of records with a p-value strictly below `alpha`
    pub fn significant_count(&self, alpha: f64) -> usize {
        self.records.iter().filter(|r| r.p_value < alpha).count()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Tabular form with the columns
    /// `parameter, p_value, pass_mean, fail_mean, pass_std, fail_std, mean_diff, pct_diff`
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let field = |f: fn(&SignificanceRecord) -> f64| -> Vec<f64> { self.records.iter().map(f).collect() };
        let names: Vec<&str> = self.records.iter().map(|r| r.parameter.as_str()).collect();

        let df = DataFrame::new(vec![
            Column::new("parameter".into(), names),
            Column::new("p_value".into(), field(|r| r.p_value)),
            Column::new("pass_mean".into(), field(|r| r.pass_mean)),
            Column::new("fail_mean".into(), field(|r| r.fail_mean)),
            Column::new("pass_std".into(), field(|r| r.pass_std)),
            Column::new("fail_std".into(), field(|r| r.fail_std)),
            Column::new("mean_diff".into(), field(|r| r.mean_diff)),
            Column::new("pct_diff".into(), field(|r| r.pct_diff)),
        ])?;
        Ok(df)
    }
}

/// Split values into pass and fail subsets, dropping missing and non-finite values
pub fn partition_by_outcome(values: &[Option<f64>], outcomes: &[Outcome]) -> (Vec<f64>, Vec<f64>) {
    let mut pass = Vec::new();
    let mut fail = Vec::new();
    for (value, outcome) in values.iter().zip(outcomes) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            match outcome {
                Outcome::Pass => pass.push(v),
                Outcome::Fail => fail.push(v),
            }
        }
    }
    (pass, fail)
}

/// Test a single parameter; `None` when either class has too few observations.
pub fn evaluate_parameter(
    parameter: &str,
    pass: &[f64],
    fail: &[f64],
    config: &RankerConfig,
) -> Option<SignificanceRecord> {
    let min_samples = config.min_samples.max(2);
    if pass.len() < min_samples || fail.len() < min_samples {
        return None;
    }

    let test = welch_t_test(pass, fail)?;
    let pass_mean = mean(pass)?;
    let fail_mean = mean(fail)?;
    let mean_diff = fail_mean - pass_mean;
    let pct_diff = mean_diff / (pass_mean.abs() + config.epsilon) * 100.0;

    Some(SignificanceRecord {
        rank: 0,
        parameter: parameter.to_string(),
        p_value: test.p_value,
        t_statistic: test.statistic,
        degrees_of_freedom: test.degrees_of_freedom,
        pass_count: pass.len(),
        fail_count: fail.len(),
        pass_mean: round_to(pass_mean, STAT_DECIMALS),
        fail_mean: round_to(fail_mean, STAT_DECIMALS),
        pass_std: round_to(sample_std(pass)?, STAT_DECIMALS),
        fail_std: round_to(sample_std(fail)?, STAT_DECIMALS),
        mean_diff: round_to(mean_diff, STAT_DECIMALS),
        pct_diff: round_to(pct_diff, PCT_DECIMALS),
    })
}

/// Rank every parameter of a table by pass/fail significance.
///
/// The label is validated before any statistics are computed. Parameters are
/// evaluated in parallel; the records are gathered in table order and then
/// stable-sorted by p-value, so equal p-values keep their column order.
///
/// # Arguments
/// * `df` - Measurement table (may still contain missing values)
/// * `label` - Label column and its pass/fail sentinels
/// * `config` - Minimum sample size and percent-difference epsilon
/// * `progress` - Optional progress bar advanced once per parameter
pub fn rank_parameters(
    df: &DataFrame,
    label: &LabelSpec,
    config: &RankerConfig,
    progress: Option<&ProgressBar>,
) -> Result<SignificanceReport> {
    let outcomes = validate_labels(df, label)?;
    let params = parameter_columns(df, label)?;
    let (pass_units, fail_units) = count_outcomes(&outcomes);

    let evaluated: Vec<(String, Option<SignificanceRecord>)> = params
        .par_iter()
        .map(|name| {
            let values = numeric_values(df, name)?;
            let (pass, fail) = partition_by_outcome(&values, &outcomes);
            let record = evaluate_parameter(name, &pass, &fail, config);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            Ok((name.clone(), record))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(evaluated.len());
    let mut skipped = Vec::new();
    for (name, record) in evaluated {
        match record {
            Some(record) => records.push(record),
            None => skipped.push(name),
        }
    }

    records.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i + 1;
    }

    Ok(SignificanceReport {
        records,
        skipped,
        pass_units,
        fail_units,
    })
}
