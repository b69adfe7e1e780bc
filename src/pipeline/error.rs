//! Error types for malformed measurement tables.
//!
//! These are precondition violations detected before any statistics are
//! computed. Per-parameter degeneracies (too few samples, zero variance) are
//! not errors and never surface here.

use thiserror::Error;

/// Errors raised when a measurement table cannot be analyzed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The configured label column is absent from the table.
    #[error("Label column '{column}' not found. Available columns: {available:?}")]
    MissingLabelColumn {
        /// Name of the expected label column
        column: String,
        /// Columns that were present
        available: Vec<String>,
    },

    /// A row has no label value.
    #[error("Label column '{column}' has a missing value at row {row}")]
    NullLabel {
        /// Name of the label column
        column: String,
        /// Zero-based row index of the first missing label
        row: usize,
    },

    /// The label column holds more than two distinct outcome values.
    #[error("Label column '{column}' must hold exactly two outcome values, found {}: {values:?}", values.len())]
    TooManyLabelValues {
        /// Name of the label column
        column: String,
        /// Distinct values found (sorted)
        values: Vec<String>,
    },

    /// A label value matches neither the pass nor the fail sentinel.
    #[error("Label value '{value}' at row {row} is neither the pass value '{pass}' nor the fail value '{fail}'")]
    UnknownLabelValue {
        /// Offending value
        value: String,
        /// Zero-based row index
        row: usize,
        /// Configured pass sentinel
        pass: String,
        /// Configured fail sentinel
        fail: String,
    },

    /// The pass and fail sentinels are the same value.
    #[error("Pass and fail values must differ, both are '{value}'")]
    IndistinctSentinels {
        /// The shared sentinel value
        value: String,
    },

    /// A parameter column cannot be interpreted as numeric.
    #[error("Parameter column '{column}' is not numeric (dtype {dtype})")]
    NonNumericParameter {
        /// Name of the offending column
        column: String,
        /// The column's data type as reported by polars
        dtype: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indistinct_sentinels_display() {
        let err = TableError::IndistinctSentinels {
            value: "1".to_string(),
        };
        assert_eq!(err.to_string(), "Pass and fail values must differ, both are '1'");
    }

    #[test]
    fn test_missing_label_display() {
        let err = TableError::MissingLabelColumn {
            column: "label".to_string(),
            available: vec!["p1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Label column 'label' not found. Available columns: [\"p1\"]"
        );
    }

    #[test]
    fn test_too_many_values_display() {
        let err = TableError::TooManyLabelValues {
            column: "label".to_string(),
            values: vec!["-1".to_string(), "0".to_string(), "1".to_string()],
        };
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn test_unknown_value_display() {
        let err = TableError::UnknownLabelValue {
            value: "2".to_string(),
            row: 4,
            pass: "-1".to_string(),
            fail: "1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Label value '2' at row 4 is neither the pass value '-1' nor the fail value '1'"
        );
    }
}
