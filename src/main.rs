//! yieldscope: Yield Significance CLI Tool
//!
//! Cleans a unit-level measurement table and ranks every process parameter
//! by how strongly it separates failing units from passing ones.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use yieldscope::cli::{combine::run_combine, confirm_overwrite, Cli, Commands};
use yieldscope::pipeline::{
    clean_measurements, dataset_overview, load_dataset, rank_parameters, save_dataset,
};
use yieldscope::report::{
    display_top_parameters, export_dashboard_tables, export_significance_json, package_reports,
    write_significance_csv, write_surviving_parameters, AnalysisSummary, ExportParams,
};
use yieldscope::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

const SURVIVING_PARAMS_FILE: &str = "surviving_params.txt";
const SIGNIFICANCE_CSV_FILE: &str = "parameter_significance.csv";
const SIGNIFICANCE_JSON_FILE: &str = "parameter_significance.json";
const BUNDLE_FILE: &str = "yield_reports.zip";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Combine {
                data,
                labels,
                output,
            } => run_combine(data, labels, output.as_deref()),
        };
    }

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let output_dir = cli
        .output_dir()
        .context("Could not derive an output directory from the input path")?;

    let label = cli.label_spec();
    let cleaner_config = cli.cleaner_config();
    let ranker_config = cli.ranker_config();
    let top_k = cli.top_k();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        input,
        &label.column,
        &output_dir,
        cleaner_config.variance_threshold,
        ranker_config.min_samples,
        cli.alpha,
    );

    if !prepare_output_dir(&output_dir, cli.no_confirm)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    // Step 1: Load dataset
    print_step_header(1, "Load Measurements");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    let overview = dataset_overview(&df, &label)?;
    overview.display();

    let mut summary = AnalysisSummary::new(overview.parameters, cli.alpha);
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Cleaning
    print_step_header(2, "Clean Measurements");

    let step_start = Instant::now();
    let spinner = create_spinner("Dropping empty columns, imputing medians, filtering variance...");
    let clean = clean_measurements(&df, &label, &cleaner_config)?;
    finish_with_success(&spinner, "Cleaning complete");

    if clean.dropped_all_missing.is_empty() {
        print_info("No fully missing parameters");
    } else {
        print_count("fully missing parameter(s)", clean.dropped_all_missing.len(), None);
    }
    println!(
        "      Imputed {} missing cell(s) with column medians",
        style(clean.imputed_cells).yellow().bold()
    );
    if clean.dropped_low_variance.is_empty() {
        print_info("No parameters below the variance threshold");
    } else {
        print_count(
            "near-constant parameter(s)",
            clean.dropped_low_variance.len(),
            Some(&format!("(variance < {})", cleaner_config.variance_threshold)),
        );
    }
    print_success(&format!("{} parameters remain", clean.surviving.len()));
    if clean.surviving.is_empty() {
        print_warning("No parameters survived cleaning; the report will be empty");
    }

    summary.add_cleaning(&clean);
    let clean_elapsed = step_start.elapsed();
    summary.set_clean_time(clean_elapsed);
    print_step_time(clean_elapsed);

    // Step 3: Significance ranking
    print_step_header(3, "Rank Parameters (Welch's t-test)");

    let step_start = Instant::now();
    let pb = create_progress_bar(clean.surviving.len() as u64, "Testing");
    let report = rank_parameters(&clean.table, &label, &ranker_config, Some(&pb))?;
    if report.skipped.is_empty() {
        finish_with_success(&pb, &format!("Tested {} parameters", report.len()));
    } else {
        finish_with_warning(
            &pb,
            &format!(
                "Tested {} parameters, skipped {} with fewer than {} observations per class",
                report.len(),
                report.skipped.len(),
                ranker_config.min_samples
            ),
        );
    }
    println!(
        "      {} parameter(s) with p < {}",
        style(report.significant_count(cli.alpha)).yellow().bold(),
        cli.alpha
    );

    summary.add_ranking(&report);
    let rank_elapsed = step_start.elapsed();
    summary.set_rank_time(rank_elapsed);
    print_step_time(rank_elapsed);

    // Step 4: Save outputs
    print_step_header(4, "Save Results");

    let step_start = Instant::now();
    let spinner = create_spinner("Writing outputs...");

    let clean_path = output_dir.join(clean_file_name(input));
    let mut clean_table = clean.table.clone();
    save_dataset(&mut clean_table, &clean_path)?;

    let surviving_path = output_dir.join(SURVIVING_PARAMS_FILE);
    write_surviving_parameters(&clean.surviving, &surviving_path)?;

    let csv_path = output_dir.join(SIGNIFICANCE_CSV_FILE);
    write_significance_csv(&report, &csv_path)?;

    let json_path = output_dir.join(SIGNIFICANCE_JSON_FILE);
    let input_display = input.display().to_string();
    export_significance_json(
        &report,
        &clean,
        &json_path,
        &ExportParams {
            input_file: &input_display,
            label_column: &label.column,
            pass_value: &label.pass_value,
            fail_value: &label.fail_value,
            variance_threshold: cleaner_config.variance_threshold,
            min_samples: ranker_config.min_samples,
            significance_level: cli.alpha,
        },
    )?;

    let mut report_files = vec![surviving_path, csv_path, json_path];
    if cli.dashboard {
        report_files.extend(export_dashboard_tables(
            &clean.table,
            &label,
            &report,
            top_k,
            &output_dir,
        )?);
    }
    finish_with_success(&spinner, &format!("Saved to {}", output_dir.display()));

    println!("      Clean table: {}", style(clean_path.display()).dim());
    if cli.bundle {
        let zip_path = output_dir.join(BUNDLE_FILE);
        package_reports(&report_files, &zip_path)?;
        println!("      Reports:     {}", style(zip_path.display()).dim());
    } else {
        for path in &report_files {
            println!("      Report:      {}", style(path.display()).dim());
        }
    }

    let save_elapsed = step_start.elapsed();
    summary.set_save_time(save_elapsed);
    print_step_time(save_elapsed);

    summary.display();
    display_top_parameters(&report, top_k);
    print_completion();

    Ok(())
}

/// Clean table file name: `<input stem>_clean.csv`
fn clean_file_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("measurements");
    PathBuf::from(format!("{}_clean.csv", stem))
}

/// Create the output directory and ask before writing into a non-empty one.
///
/// Returns `false` when the user declines.
fn prepare_output_dir(dir: &Path, no_confirm: bool) -> Result<bool> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let existing = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read output directory: {}", dir.display()))?
        .count();

    if existing == 0 || no_confirm {
        return Ok(true);
    }
    confirm_overwrite(dir, existing)
}
