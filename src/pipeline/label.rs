//! Outcome label validation and mapping
//!
//! The label column must hold exactly two sentinel values, one meaning the
//! unit passed and one meaning it failed. Values are compared by their string
//! rendering so integer (`-1`/`1`), float (`-1.0`/`1.0`) and string
//! (`pass`/`fail`) encodings are all accepted.

use std::collections::BTreeSet;

use anyhow::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::TableError;

/// Default name of the outcome column
pub const DEFAULT_LABEL_COLUMN: &str = "label";

/// Default sentinel for passing units
pub const DEFAULT_PASS_VALUE: &str = "-1";

/// Default sentinel for failing units
pub const DEFAULT_FAIL_VALUE: &str = "1";

/// Which column holds the outcome and how its two values are encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    /// Name of the label column
    pub column: String,
    /// Value that marks a passing unit
    pub pass_value: String,
    /// Value that marks a failing unit
    pub fail_value: String,
}

impl LabelSpec {
    pub fn new(column: impl Into<String>, pass_value: impl Into<String>, fail_value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            pass_value: pass_value.into(),
            fail_value: fail_value.into(),
        }
    }
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_COLUMN, DEFAULT_PASS_VALUE, DEFAULT_FAIL_VALUE)
    }
}

/// Outcome class of a single unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pass => write!(f, "Pass"),
            Outcome::Fail => write!(f, "Fail"),
        }
    }
}

/// Validate the label column and map every row to its outcome.
///
/// Fails fast with a [`TableError`] when the two sentinels are equal, the
/// column is absent or has a missing value, it holds more than two distinct
/// values, or a value matches neither sentinel. A zero-row table is valid and
/// yields no outcomes.
pub fn validate_labels(df: &DataFrame, spec: &LabelSpec) -> Result<Vec<Outcome>> {
    if spec.pass_value == spec.fail_value {
        return Err(TableError::IndistinctSentinels {
            value: spec.pass_value.clone(),
        }
        .into());
    }

    let label_col = df.column(&spec.column).map_err(|_| TableError::MissingLabelColumn {
        column: spec.column.clone(),
        available: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })?;

    let values = column_to_string_vec(label_col)?;

    if let Some(row) = values.iter().position(|v| v.is_none()) {
        return Err(TableError::NullLabel {
            column: spec.column.clone(),
            row,
        }
        .into());
    }

    let distinct: BTreeSet<&str> = values.iter().flatten().map(|s| s.as_str()).collect();
    if distinct.len() > 2 {
        return Err(TableError::TooManyLabelValues {
            column: spec.column.clone(),
            values: distinct.into_iter().map(|s| s.to_string()).collect(),
        }
        .into());
    }

    let mut outcomes = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().flatten().enumerate() {
        let outcome = if value == spec.pass_value {
            Outcome::Pass
        } else if value == spec.fail_value {
            Outcome::Fail
        } else {
            return Err(TableError::UnknownLabelValue {
                value,
                row,
                pass: spec.pass_value.clone(),
                fail: spec.fail_value.clone(),
            }
            .into());
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// List the parameter columns of a table (every column except the label).
///
/// Fails with [`TableError::NonNumericParameter`] when a parameter column
/// cannot hold numbers. All-null columns are accepted whatever their dtype,
/// since CSV readers cannot infer a type for them.
pub fn parameter_columns(df: &DataFrame, spec: &LabelSpec) -> Result<Vec<String>> {
    let mut params = Vec::with_capacity(df.width().saturating_sub(1));

    for col in df.get_columns() {
        if col.name().as_str() == spec.column {
            continue;
        }
        let all_null = col.null_count() == col.len();
        if !col.dtype().is_primitive_numeric() && !all_null {
            return Err(TableError::NonNumericParameter {
                column: col.name().to_string(),
                dtype: col.dtype().to_string(),
            }
            .into());
        }
        params.push(col.name().to_string());
    }

    Ok(params)
}

/// Count passing and failing units
pub fn count_outcomes(outcomes: &[Outcome]) -> (usize, usize) {
    let fails = outcomes.iter().filter(|o| **o == Outcome::Fail).count();
    (outcomes.len() - fails, fails)
}

/// Convert a column to a Vec of Option<String> for comparison
fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.filter(|n| !n.is_nan()).map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
