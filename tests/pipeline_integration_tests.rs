// Pipeline integration tests
//
// Purpose: End-to-end runs over the bundled sample dataset and in-memory CSVs
// Run with: cargo test --test pipeline_integration_tests

use approx::assert_relative_eq;
use mass_balance_rust::classification::FALLBACK_ZONE;
use mass_balance_rust::pipeline::{COL_AMB, COL_RMB, COL_Z_MB};
use mass_balance_rust::{
    DiagnosticConfig, DiagnosticPipeline, DiagnosticResults, DiagnosticZone, InputFormat, PipelineError,
    RawDataset, ReportGenerator, ZmbInterpretation,
};

// Helper: run the default pipeline over CSV text
fn run_csv(csv: &str) -> Result<DiagnosticResults, PipelineError> {
    let raw = RawDataset::from_bytes(csv.as_bytes().to_vec(), InputFormat::Delimited { separator: b',' }, "inline.csv")?;
    DiagnosticPipeline::new(DiagnosticConfig::default())?.run(&raw)
}

fn single_row(assay: f64, degradant: f64) -> DiagnosticResults {
    let csv = format!("API Assay,Stress Type,Time,Degradant A\n{},Acid,1,{}\n", assay, degradant);
    run_csv(&csv).expect("pipeline should succeed")
}

// =========================================================================
// Section 1: Sample dataset
// =========================================================================

#[test]
fn test_sample_dataset_end_to_end() {
    let raw = RawDataset::sample().unwrap();
    let results = DiagnosticPipeline::new(DiagnosticConfig::default()).unwrap().run(&raw).unwrap();

    // One all-blank line is dropped
    assert_eq!(results.rows.len(), 9);
    assert_eq!(results.table.height(), 9);
    assert_eq!(results.degradant_columns, vec!["degradant_a", "degradant_b", "degradant_c"]);

    let zones: Vec<DiagnosticZone> = results.rows.iter().map(|r| r.zone).collect();
    assert_eq!(
        zones,
        vec![
            DiagnosticZone::AnalyticalVariability,
            DiagnosticZone::AnalyticalVariability,
            DiagnosticZone::MissingDegradants,
            DiagnosticZone::AnalyticalVariability,
            DiagnosticZone::PhysicalLoss,
            DiagnosticZone::Overestimation,
            DiagnosticZone::AnalyticalVariability,
            DiagnosticZone::MethodOrPathwayIssue,
            DiagnosticZone::MissingDegradants,
        ]
    );

    let issue_rows: Vec<usize> = results.issues.iter().map(|i| i.row).collect();
    assert_eq!(issue_rows, vec![7, 8]);
    assert_eq!(results.issues[0].issues, "API assay out of range");
    assert_eq!(results.issues[1].issues, "Suspicious mass loss");
}

#[test]
fn test_sample_non_numeric_cell_counts_as_zero() {
    let raw = RawDataset::sample().unwrap();
    let results = DiagnosticPipeline::new(DiagnosticConfig::default()).unwrap().run(&raw).unwrap();

    // Humidity row has "ND" for Degradant A
    let humidity = &results.rows[6];
    assert_eq!(humidity.stress_type.as_deref(), Some("Humidity"));
    assert_relative_eq!(humidity.metrics.total_degradants, 1.1, epsilon = 1e-9);
    assert_relative_eq!(humidity.metrics.amb.unwrap(), 98.6, epsilon = 1e-9);
}

#[test]
fn test_sample_report_summary() {
    let raw = RawDataset::sample().unwrap();
    let results = DiagnosticPipeline::new(DiagnosticConfig::default()).unwrap().run(&raw).unwrap();
    let report = ReportGenerator::generate(&results, 2.5);

    // 4 of 9 rows within |Z_MB| <= 2
    assert_eq!(report.summary.within_variability_pct, Some(44.4));
    assert_eq!(report.summary.issue_rows, 2);
    let total: usize = report.summary.zone_counts.iter().map(|z| z.count).sum();
    assert_eq!(total, 9);
}

#[test]
fn test_spreadsheet_sample_matches_csv_sample() {
    let pipeline = DiagnosticPipeline::new(DiagnosticConfig::default()).unwrap();
    let xlsx_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_data.xlsx");

    let from_csv = pipeline.run(&RawDataset::sample().unwrap()).unwrap();
    let from_xlsx = pipeline.run(&RawDataset::load(&xlsx_path).unwrap()).unwrap();

    assert_eq!(from_xlsx.rows.len(), from_csv.rows.len());
    assert_eq!(from_xlsx.degradant_columns, from_csv.degradant_columns);
    for (x, c) in from_xlsx.rows.iter().zip(&from_csv.rows) {
        assert_eq!(x.zone, c.zone, "row {}", c.row);
        assert_eq!(x.stress_type, c.stress_type);
        assert_relative_eq!(x.metrics.total_degradants, c.metrics.total_degradants, epsilon = 1e-9);
    }
    assert_eq!(from_xlsx.issues, from_csv.issues);
}

// =========================================================================
// Section 2: Reference scenarios
// =========================================================================

#[test]
fn test_scenario_within_variability() {
    let results = single_row(99.0, 1.0);
    let row = &results.rows[0];
    assert_eq!(row.zone, DiagnosticZone::AnalyticalVariability);
    assert_eq!(row.action, "No investigation required");
    assert_eq!(row.interpretation, ZmbInterpretation::WithinVariability);
}

#[test]
fn test_scenario_missing_degradants() {
    let results = single_row(90.0, 2.0);
    let m = results.rows[0].metrics;
    assert_relative_eq!(m.amb.unwrap(), 92.0, epsilon = 1e-9);
    assert_relative_eq!(m.rmb.unwrap(), 0.2, epsilon = 1e-9);
    assert_relative_eq!(m.z_mb.unwrap(), -3.2, epsilon = 1e-9);
    assert_eq!(results.rows[0].zone, DiagnosticZone::MissingDegradants);
    assert_eq!(results.rows[0].action, "Search for additional degradants / volatility studies");
}

#[test]
fn test_scenario_zone_one_precedence() {
    let results = single_row(95.0, 4.0);
    let m = results.rows[0].metrics;
    assert_relative_eq!(m.amb.unwrap(), 99.0, epsilon = 1e-9);
    assert_relative_eq!(m.rmb.unwrap(), 0.8, epsilon = 1e-9);
    assert_relative_eq!(m.z_mb.unwrap(), -0.4, epsilon = 1e-9);
    assert_eq!(results.rows[0].zone, DiagnosticZone::AnalyticalVariability);
}

#[test]
fn test_scenario_over_recovery_falls_back() {
    let results = single_row(105.0, 3.0);
    let row = &results.rows[0];
    assert_eq!(row.metrics.rmb, None);
    assert_eq!(row.metrics.rmbd, None);
    assert_relative_eq!(row.metrics.amb.unwrap(), 108.0, epsilon = 1e-9);
    assert_relative_eq!(row.metrics.z_mb.unwrap(), 3.2, epsilon = 1e-9);
    assert_eq!(row.zone, FALLBACK_ZONE);
    assert_eq!(row.action, "Investigate physical loss or degradation pathways");
    assert_eq!(results.issues.len(), 1);

    // Null cell in the enriched table
    assert_eq!(results.table.column(COL_RMB).unwrap().null_count(), 1);
}

// =========================================================================
// Section 3: Schema handling
// =========================================================================

#[test]
fn test_alias_spellings_normalize() {
    let results = run_csv(" api assay ,STRESS,  Months , Degradant X \n97,Acid,1,1\n").unwrap();
    assert_eq!(results.degradant_columns, vec!["degradant_x"]);
    assert_relative_eq!(results.rows[0].metrics.amb.unwrap(), 98.0, epsilon = 1e-9);
}

#[test]
fn test_colliding_degradant_headers_are_all_summed() {
    let results = run_csv("Assay,Stress,Time,Degradant A,Degradant  A\n90,Acid,1,1.0,2.0\n").unwrap();
    assert_eq!(results.degradant_columns, vec!["degradant_a", "degradant__a"]);
    assert_relative_eq!(results.rows[0].metrics.total_degradants, 3.0, epsilon = 1e-12);

    let results = run_csv("Assay,Stress,Time,Degradant A,degradant_a\n90,Acid,1,1.0,2.0\n").unwrap();
    assert_eq!(results.degradant_columns, vec!["degradant_a", "degradant_a_1"]);
    assert_relative_eq!(results.rows[0].metrics.total_degradants, 3.0, epsilon = 1e-12);
}

#[test]
fn test_non_numeric_degradant_text() {
    let results = run_csv("Assay,Stress,Time,Degradant 1,Degradant 2\n95,Acid,1,<LOQ,2.5\n").unwrap();
    assert_relative_eq!(results.rows[0].metrics.total_degradants, 2.5, epsilon = 1e-12);
}

#[test]
fn test_no_degradant_columns_is_schema_failure() {
    let err = run_csv("Assay,Stress,Time,Impurity A\n95,Acid,1,2\n").unwrap_err();
    assert!(matches!(err, PipelineError::NoDegradantColumns { .. }));
    assert!(err.to_string().contains("inline.csv"));
}

#[test]
fn test_missing_required_column_names_it() {
    let err = run_csv("Assay,Time,Degradant A\n95,1,2\n").unwrap_err();
    assert!(err.to_string().contains("stress_type"));
}

#[test]
fn test_metric_columns_match_rows() {
    let results = run_csv("Assay,Stress,Time,Degradant A\n99,Acid,0,1\n90,Acid,1,2\n105,Acid,2,3\n").unwrap();
    let amb = results.table.column(COL_AMB).unwrap().f64().unwrap().clone();
    let z = results.table.column(COL_Z_MB).unwrap().f64().unwrap().clone();
    for (idx, row) in results.rows.iter().enumerate() {
        assert_eq!(amb.get(idx), row.metrics.amb);
        assert_eq!(z.get(idx), row.metrics.z_mb);
    }
}

#[test]
fn test_custom_uncertainty() {
    let config = DiagnosticConfig {
        uncertainty: 5.0,
        ..Default::default()
    };
    let raw = RawDataset::from_bytes(
        b"Assay,Stress,Time,Degradant A\n90,Acid,1,2\n".to_vec(),
        InputFormat::Delimited { separator: b',' },
        "inline.csv",
    )
    .unwrap();
    let results = DiagnosticPipeline::new(config).unwrap().run(&raw).unwrap();
    // Z = -8 / 5
    assert_relative_eq!(results.rows[0].metrics.z_mb.unwrap(), -1.6, epsilon = 1e-9);
    assert_eq!(results.rows[0].zone, DiagnosticZone::AnalyticalVariability);
}

#[test]
fn test_invalid_uncertainty_rejected() {
    let config = DiagnosticConfig {
        uncertainty: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        DiagnosticPipeline::new(config),
        Err(PipelineError::Configuration(_))
    ));
}
