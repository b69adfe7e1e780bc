//! Significance report export: CSV table, JSON document, parameter list, zip bundle

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{CleanOutcome, SignificanceRecord, SignificanceReport};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// yieldscope version
    pub yieldscope_version: String,
    /// Input file path
    pub input_file: String,
    /// Label column name
    pub label_column: String,
    pub pass_value: String,
    pub fail_value: String,
    /// Absolute variance cutoff used by the cleaner
    pub variance_threshold: f64,
    /// Minimum observations per class
    pub min_samples: usize,
    /// Significance level used for the summary count
    pub significance_level: f64,
}

/// Counts describing the cleaning and ranking steps
#[derive(Serialize)]
pub struct ReportCounts {
    pub initial_parameters: usize,
    pub dropped_all_missing: usize,
    pub imputed_cells: usize,
    pub dropped_low_variance: usize,
    pub clean_parameters: usize,
    pub parameters_tested: usize,
    pub parameters_skipped: usize,
    pub significant_parameters: usize,
    pub pass_units: usize,
    pub fail_units: usize,
}

/// Complete significance export with metadata
#[derive(Serialize)]
pub struct SignificanceExport<'a> {
    pub metadata: AnalysisMetadata,
    pub summary: ReportCounts,
    /// Parameters that could not be tested
    pub skipped: &'a [String],
    /// Ranked per-parameter results
    pub parameters: &'a [SignificanceRecord],
}

/// Parameters for the JSON export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub label_column: &'a str,
    pub pass_value: &'a str,
    pub fail_value: &'a str,
    pub variance_threshold: f64,
    pub min_samples: usize,
    pub significance_level: f64,
}

/// Write the surviving parameter names, one per line
pub fn write_surviving_parameters(names: &[String], output_path: &Path) -> Result<()> {
    std::fs::write(output_path, names.join("\n")).with_context(|| {
        format!(
            "Failed to write parameter list to {}",
            output_path.display()
        )
    })
}

/// Write the ranked report as CSV
pub fn write_significance_csv(report: &SignificanceReport, output_path: &Path) -> Result<()> {
    let mut df = report.to_dataframe()?;
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("Failed to create CSV file: {}", output_path.display()))?;
    CsvWriter::new(&mut file)
        .finish(&mut df)
        .with_context(|| format!("Failed to write CSV file: {}", output_path.display()))?;
    Ok(())
}

/// Export the ranked report and run metadata to a JSON file
pub fn export_significance_json(
    report: &SignificanceReport,
    clean: &CleanOutcome,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = SignificanceExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            yieldscope_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            label_column: params.label_column.to_string(),
            pass_value: params.pass_value.to_string(),
            fail_value: params.fail_value.to_string(),
            variance_threshold: params.variance_threshold,
            min_samples: params.min_samples,
            significance_level: params.significance_level,
        },
        summary: ReportCounts {
            initial_parameters: clean.initial_parameters,
            dropped_all_missing: clean.dropped_all_missing.len(),
            imputed_cells: clean.imputed_cells,
            dropped_low_variance: clean.dropped_low_variance.len(),
            clean_parameters: clean.surviving.len(),
            parameters_tested: report.len(),
            parameters_skipped: report.skipped.len(),
            significant_parameters: report.significant_count(params.significance_level),
            pass_units: report.pass_units,
            fail_units: report.fail_units,
        },
        skipped: &report.skipped,
        parameters: &report.records,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize significance report to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write significance report to {}",
            output_path.display()
        )
    })?;

    Ok(())
}

/// Package report files into a zip archive.
///
/// Files are stored under their own file names and removed once archived.
pub fn package_reports(files: &[PathBuf], zip_path: &Path) -> Result<()> {
    use std::io::{Read, Write};
    use ::zip::write::SimpleFileOptions;
    use ::zip::ZipWriter;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(::zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    for path in files {
        std::fs::remove_file(path).ok();
    }

    Ok(())
}
