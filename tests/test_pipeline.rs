//! Integration tests for the full load, clean, rank and export pipeline

use yieldscope::pipeline::*;
use yieldscope::report::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_full_pipeline_from_csv() {
    let mut df = create_measurement_dataframe();
    let (temp_dir, csv_path) = create_temp_csv(&mut df);
    let label = LabelSpec::default();

    let df = load_dataset(&csv_path, 100).unwrap();

    let overview = dataset_overview(&df, &label).unwrap();
    assert_eq!(overview.rows, 10);
    assert_eq!(overview.parameters, 5);
    assert_eq!(overview.pass_units, 6);
    assert_eq!(overview.fail_units, 4);
    assert_eq!(overview.missing_cells, 13);
    assert_eq!(
        overview.most_missing,
        vec![("param_empty".to_string(), 1.0), ("param_gappy".to_string(), 0.3)]
    );

    let clean = clean_measurements(&df, &label, &CleanerConfig::default()).unwrap();
    assert_eq!(clean.surviving, vec!["param_strong", "param_noise", "param_gappy"]);
    assert_eq!(total_nulls(&clean.table), 0);

    let report = rank_parameters(&clean.table, &label, &RankerConfig::default(), None).unwrap();
    assert_eq!(report.len(), 3);
    assert_eq!(report.records[0].parameter, "param_strong");
    assert!(report.records[0].p_value < 0.001);

    let surviving_path = temp_dir.path().join("surviving_params.txt");
    write_surviving_parameters(&clean.surviving, &surviving_path).unwrap();
    let listed = std::fs::read_to_string(&surviving_path).unwrap();
    assert_eq!(listed.lines().collect::<Vec<_>>(), clean.surviving);

    let csv_report = temp_dir.path().join("parameter_significance.csv");
    write_significance_csv(&report, &csv_report).unwrap();
    let reloaded = load_dataset(&csv_report, 100).unwrap();
    assert_shape(&reloaded, 3, 8);
    assert_has_columns(&reloaded, &["parameter", "p_value", "pct_diff"]);

    let json_report = temp_dir.path().join("parameter_significance.json");
    export_significance_json(
        &report,
        &clean,
        &json_report,
        &ExportParams {
            input_file: "test_data.csv",
            label_column: "label",
            pass_value: "-1",
            fail_value: "1",
            variance_threshold: 0.01,
            min_samples: 3,
            significance_level: 0.05,
        },
    )
    .unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_report).unwrap()).unwrap();
    assert_eq!(json["summary"]["initial_parameters"], 5);
    assert_eq!(json["summary"]["dropped_all_missing"], 1);
    assert_eq!(json["summary"]["dropped_low_variance"], 1);
    assert_eq!(json["parameters"][0]["parameter"], "param_strong");
    assert_eq!(json["parameters"][0]["rank"], 1);
}

#[test]
fn test_dashboard_exports() {
    let df = create_measurement_dataframe();
    let label = LabelSpec::default();
    let clean = clean_measurements(&df, &label, &CleanerConfig::default()).unwrap();
    let report = rank_parameters(&clean.table, &label, &RankerConfig::default(), None).unwrap();

    let temp_dir = tempfile::TempDir::new().unwrap();
    let paths = export_dashboard_tables(&clean.table, &label, &report, 2, temp_dir.path()).unwrap();
    assert_eq!(paths.len(), 3);
    for path in &paths {
        assert!(path.exists(), "{} was not written", path.display());
    }

    let comparison = load_dataset(&temp_dir.path().join(PARAM_COMPARISON_FILE), 100).unwrap();
    assert_shape(&comparison, 4, 4);

    let units = load_dataset(&temp_dir.path().join(UNIT_LEVEL_FILE), 100).unwrap();
    assert_shape(&units, 10, 5);
    assert_has_columns(&units, &["param_strong", "outcome", "unit_id"]);
}

#[test]
fn test_bundle_replaces_report_files() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let first = temp_dir.path().join("surviving_params.txt");
    let second = temp_dir.path().join("parameter_significance.csv");
    std::fs::write(&first, "param_0\nparam_1").unwrap();
    std::fs::write(&second, "parameter,p_value\nparam_0,0.01").unwrap();

    let zip_path = temp_dir.path().join("yield_reports.zip");
    package_reports(&[first.clone(), second.clone()], &zip_path).unwrap();

    assert!(zip_path.exists());
    assert!(!first.exists());
    assert!(!second.exists());

    let archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["parameter_significance.csv", "surviving_params.txt"]);
}

#[test]
fn test_csv_and_parquet_produce_same_results() {
    let mut df = create_large_measurement_dataframe(120, 15, 5);
    let (_csv_dir, csv_path) = create_temp_csv(&mut df);
    let (_pq_dir, parquet_path) = create_temp_parquet(&mut df);
    let label = LabelSpec::default();

    let from_csv = load_dataset(&csv_path, 0).unwrap();
    let from_parquet = load_dataset(&parquet_path, 0).unwrap();

    let clean_csv = clean_measurements(&from_csv, &label, &CleanerConfig::default()).unwrap();
    let clean_pq = clean_measurements(&from_parquet, &label, &CleanerConfig::default()).unwrap();
    assert_eq!(clean_csv.surviving, clean_pq.surviving);
    assert_eq!(clean_csv.imputed_cells, clean_pq.imputed_cells);

    let report_csv = rank_parameters(&clean_csv.table, &label, &RankerConfig::default(), None).unwrap();
    let report_pq = rank_parameters(&clean_pq.table, &label, &RankerConfig::default(), None).unwrap();
    let order = |r: &SignificanceReport| -> Vec<String> {
        r.records.iter().map(|rec| rec.parameter.clone()).collect()
    };
    assert_eq!(order(&report_csv), order(&report_pq));
}

#[test]
fn test_pipeline_with_nothing_left_after_cleaning() {
    let df = polars::df! {
        "empty" => [None::<f64>, None, None, None],
        "constant" => [3.0f64, 3.0, 3.0, 3.0],
        "label" => [-1i64, 1, -1, 1],
    }
    .unwrap();
    let label = LabelSpec::default();

    let clean = clean_measurements(&df, &label, &CleanerConfig::default()).unwrap();
    assert!(clean.surviving.is_empty());

    let report = rank_parameters(&clean.table, &label, &RankerConfig::default(), None).unwrap();
    assert!(report.is_empty());
    assert!(report.skipped.is_empty());
    assert_shape(&report.to_dataframe().unwrap(), 0, 8);
}
