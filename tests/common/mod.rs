//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a small measurement table with known characteristics
///
/// This DataFrame includes:
/// - `label`: pass (-1) / fail (1) outcome, 6 passing and 4 failing units
/// - `param_strong`: clear shift between pass and fail
/// - `param_noise`: same distribution in both classes
/// - `param_gappy`: 30% missing, otherwise informative
/// - `param_empty`: every value missing (dropped in step 1)
/// - `param_flat`: near-constant (dropped by the variance filter)
pub fn create_measurement_dataframe() -> DataFrame {
    df! {
        "param_strong" => [1.0f64, 1.2, 0.8, 1.1, 0.9, 1.0, 4.0, 4.2, 3.9, 4.1],
        "param_noise" => [3.0f64, 1.0, 2.0, 4.0, 5.0, 3.0, 2.0, 4.0, 3.0, 5.0],
        "param_gappy" => [Some(10.0f64), None, Some(11.0), Some(9.0), None, Some(10.5), Some(20.0), None, Some(21.0), Some(19.0)],
        "param_empty" => [None::<f64>, None, None, None, None, None, None, None, None, None],
        "param_flat" => [7.0f64, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 7.01],
        "label" => [-1i64, -1, -1, -1, -1, -1, 1, 1, 1, 1],
    }
    .unwrap()
}

/// The two-parameter scenario: p1 separates perfectly with zero variance,
/// p2 is identical in both classes
pub fn create_separation_dataframe() -> DataFrame {
    df! {
        "p1" => [1.0f64, 1.0, 1.0, 1.0, 1.0, 5.0, 5.0, 5.0, 5.0, 5.0],
        "p2" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        "label" => [-1i64, -1, -1, -1, -1, 1, 1, 1, 1, 1],
    }
    .unwrap()
}

/// Create a larger random table with a handful of shifted parameters
///
/// Every fifth parameter has its fail-class values shifted upward, and about
/// 5% of cells are missing.
pub fn create_large_measurement_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let labels: Vec<i64> = (0..rows)
        .map(|_| if rng.gen_bool(0.1) { 1 } else { -1 })
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);
    for i in 0..cols {
        let shift = if i % 5 == 0 { 2.0 } else { 0.0 };
        let values: Vec<Option<f64>> = labels
            .iter()
            .map(|&label| {
                if rng.gen_bool(0.05) {
                    None
                } else {
                    let base = rng.gen::<f64>() * 10.0;
                    Some(if label == 1 { base + shift } else { base })
                }
            })
            .collect();
        columns.push(Column::new(format!("param_{}", i).into(), values));
    }
    columns.push(Column::new("label".into(), labels));

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}

/// Total null count across every column
pub fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}
