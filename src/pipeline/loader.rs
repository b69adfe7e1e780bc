//! Dataset loading and saving for CSV, Parquet and raw SECOM files

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::label::DEFAULT_LABEL_COLUMN;

/// Prefix used to name raw measurement columns (`param_0`, `param_1`, ...)
pub const PARAMETER_PREFIX: &str = "param_";

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// # Arguments
/// * `path` - Input file path
/// * `infer_schema_length` - Rows used for CSV schema inference (0 = full scan)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match file_extension(path).as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            other
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Read a headerless, space-separated text table
fn read_space_separated(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_separator(b' '))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("Failed to open {}", path.display()))?
        .finish()
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Combine raw SECOM measurement and label files into one table.
///
/// The measurement file holds one unit per line with space-separated values
/// (`NaN` for gaps). The labels file holds the outcome in its first column,
/// followed by a quoted timestamp that is discarded. Parameters are named
/// `param_0..param_{M-1}` and the outcome column is appended as `label`.
pub fn load_secom(data_path: &Path, labels_path: &Path) -> Result<DataFrame> {
    let data = read_space_separated(data_path)?;
    let labels = read_space_separated(labels_path)?;

    if data.height() != labels.height() {
        anyhow::bail!(
            "Row count mismatch: {} has {} rows but {} has {}",
            data_path.display(),
            data.height(),
            labels_path.display(),
            labels.height()
        );
    }

    let mut label_col = labels
        .get_columns()
        .first()
        .cloned()
        .with_context(|| format!("Labels file has no columns: {}", labels_path.display()))?;
    label_col.rename(DEFAULT_LABEL_COLUMN.into());

    let mut columns: Vec<Column> = data
        .take_columns()
        .into_iter()
        .enumerate()
        .map(|(i, mut col)| {
            col.rename(format!("{}{}", PARAMETER_PREFIX, i).into());
            col
        })
        .collect();
    columns.push(label_col);

    DataFrame::new(columns).context("Failed to combine measurements with labels")
}

/// Save dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    match file_extension(path).as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        other => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            other
        ),
    }

    Ok(())
}
