//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    CleanerConfig, LabelSpec, RankerConfig, DEFAULT_FAIL_VALUE, DEFAULT_LABEL_COLUMN,
    DEFAULT_MIN_SAMPLES, DEFAULT_PASS_VALUE, DEFAULT_SIGNIFICANCE_LEVEL, DEFAULT_TOP_K,
    DEFAULT_VARIANCE_THRESHOLD, PCT_DIFF_EPSILON,
};

/// yieldscope - Find the process parameters that separate failing units from passing ones
#[derive(Parser, Debug)]
#[command(name = "yieldscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input measurement table (CSV or Parquet) with one row per unit
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Name of the pass/fail outcome column
    #[arg(short, long, default_value = DEFAULT_LABEL_COLUMN)]
    pub label: String,

    /// Label value that marks a passing unit
    #[arg(long, default_value = DEFAULT_PASS_VALUE, allow_hyphen_values = true)]
    pub pass_value: String,

    /// Label value that marks a failing unit
    #[arg(long, default_value = DEFAULT_FAIL_VALUE, allow_hyphen_values = true)]
    pub fail_value: String,

    /// Directory for all outputs.
    /// Defaults to the input directory with a '_yield' suffix (e.g., secom.csv → secom_yield/).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Variance threshold - drop parameters whose variance (in their own units) is below this value
    #[arg(long, default_value_t = DEFAULT_VARIANCE_THRESHOLD, value_parser = validate_variance_threshold)]
    pub variance_threshold: f64,

    /// Minimum observations per class before a parameter is tested
    #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES, value_parser = validate_min_samples)]
    pub min_samples: usize,

    /// Significance level used to count significant parameters
    #[arg(long, default_value_t = DEFAULT_SIGNIFICANCE_LEVEL, value_parser = validate_alpha)]
    pub alpha: f64,

    /// Number of parameters shown in the top-K table and dashboard comparison
    #[arg(long, default_value_t = DEFAULT_TOP_K as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub top: u64,

    /// Also write flat CSV tables for dashboard tools
    #[arg(long, default_value = "false")]
    pub dashboard: bool,

    /// Package all report files into a single zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Combine raw SECOM measurement and label files into one table
    Combine {
        /// Space-separated measurement file (one unit per line, NaN for gaps)
        data: PathBuf,

        /// Space-separated labels file (outcome, then a quoted timestamp)
        labels: PathBuf,

        /// Output file path (CSV or Parquet, defaults to <data>_combined.csv)
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Get the input path, if provided
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the output directory, deriving it from the input if not explicitly provided.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.output_dir.clone().unwrap_or_else(|| {
            let parent = input.parent().unwrap_or_else(|| std::path::Path::new("."));
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_yield", stem))
        }))
    }

    /// Label column and sentinel values
    pub fn label_spec(&self) -> LabelSpec {
        LabelSpec::new(&self.label, &self.pass_value, &self.fail_value)
    }

    pub fn cleaner_config(&self) -> CleanerConfig {
        CleanerConfig {
            variance_threshold: self.variance_threshold,
        }
    }

    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            min_samples: self.min_samples,
            epsilon: PCT_DIFF_EPSILON,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top as usize
    }
}

/// Validator for variance_threshold parameter
fn validate_variance_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value < 0.0 {
        Err(format!(
            "variance_threshold must be a non-negative number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for min_samples parameter
fn validate_min_samples(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value < 2 {
        Err(format!(
            "min_samples must be at least 2 (a variance needs two observations), got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for alpha parameter
fn validate_alpha(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(value > 0.0 && value < 1.0) {
        Err(format!("alpha must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}
