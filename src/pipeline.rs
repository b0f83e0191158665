//! Diagnostic Pipeline - main coordinator for a mass balance run
//!
//! normalize → schema check → coerce → drop empty rows → per-row evaluation
//! (metrics + validation in one pass) → zone + action.
//!
//! The whole run is a pure transformation of one input table into an
//! enriched table, an issues list and a display table. Row evaluation is
//! independent per row and runs on Rayon; output order equals input order.

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::classification::{classify_zone, DiagnosticZone, ZoneInputs};
use crate::config::DiagnosticConfig;
use crate::data::RawDataset;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics::{compute_metrics, interpret_z_mb, MassBalanceMetrics, ZmbInterpretation, Z_VARIABILITY_LIMIT};
use crate::utils::column_normalizer::{API_ASSAY, API_CODE, API_NAME, STRESS_TYPE, TIME_MONTHS, TOTAL_DEGRADANTS};
use crate::utils::{
    coerce_numeric_columns, detect_degradant_columns, drop_empty_rows, materialize_with_aliases,
    missing_required_columns, normalize_columns, sum_degradants,
};
use crate::validation::{validate_row, IssueRecord, RowIssues};

pub const COL_AMB: &str = "AMB";
pub const COL_AMBD: &str = "AMBD";
pub const COL_RMB: &str = "RMB";
pub const COL_RMBD: &str = "RMBD";
pub const COL_Z_MB: &str = "Z_MB";
pub const COL_INTERPRETATION: &str = "Z_MB Interpretation";
pub const COL_ZONE: &str = "Diagnostic Zone";
pub const COL_ACTION: &str = "Recommended Action";

/// Enriched column → end-user header, in display order
pub const DISPLAY_COLUMNS: [(&str, &str); 14] = [
    (API_NAME, "API Name"),
    (API_CODE, "API Code"),
    (STRESS_TYPE, "Stress Type"),
    (TIME_MONTHS, "Time (Months)"),
    (API_ASSAY, "API Assay (%)"),
    (TOTAL_DEGRADANTS, "Total Degradants (%)"),
    (COL_AMB, COL_AMB),
    (COL_AMBD, COL_AMBD),
    (COL_RMB, COL_RMB),
    (COL_RMBD, COL_RMBD),
    (COL_Z_MB, COL_Z_MB),
    (COL_INTERPRETATION, COL_INTERPRETATION),
    (COL_ZONE, COL_ZONE),
    (COL_ACTION, COL_ACTION),
];

/// One row after normalization and coercion
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub api_name: Option<String>,
    pub api_code: Option<String>,
    pub stress_type: Option<String>,
    pub time_months: Option<f64>,
    pub api_assay: Option<f64>,
    /// Cells of the degradant columns, same order as `degradant_columns`
    pub degradants: SmallVec<[Option<f64>; 4]>,
}

/// Metrics and issues computed together from the same row snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct RowEvaluation {
    pub metrics: MassBalanceMetrics,
    pub issues: RowIssues,
}

/// Single pass over one row
pub fn evaluate_row(record: &CanonicalRecord, uncertainty: f64) -> RowEvaluation {
    let total = sum_degradants(record.degradants.iter().copied());
    RowEvaluation {
        metrics: compute_metrics(record.api_assay, total, uncertainty),
        issues: validate_row(record.api_assay, total),
    }
}

/// Output of `preprocess_input`
#[derive(Debug, Clone)]
pub struct PreprocessedData {
    /// Canonical columns plus total_degradants, AMB, AMBD, RMB, RMBD, Z_MB
    pub table: DataFrame,
    pub degradant_columns: Vec<String>,
    pub records: Vec<CanonicalRecord>,
    pub evaluations: Vec<RowEvaluation>,
    pub issues: Vec<IssueRecord>,
}

fn text_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<Option<String>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let as_text = column.cast(&DataType::String)?;
    let values = as_text
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

fn numeric_values(df: &DataFrame, name: &str) -> PipelineResult<Vec<Option<f64>>> {
    let Ok(column) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    Ok(column.f64()?.into_iter().collect())
}

fn extract_records(df: &DataFrame, degradant_cols: &[String]) -> PipelineResult<Vec<CanonicalRecord>> {
    let names = text_values(df, API_NAME)?;
    let codes = text_values(df, API_CODE)?;
    let stresses = text_values(df, STRESS_TYPE)?;
    let times = numeric_values(df, TIME_MONTHS)?;
    let assays = numeric_values(df, API_ASSAY)?;
    let degradants = degradant_cols
        .iter()
        .map(|c| numeric_values(df, c))
        .collect::<PipelineResult<Vec<_>>>()?;

    let records = (0..df.height())
        .map(|idx| CanonicalRecord {
            api_name: names[idx].clone(),
            api_code: codes[idx].clone(),
            stress_type: stresses[idx].clone(),
            time_months: times[idx],
            api_assay: assays[idx],
            degradants: degradants.iter().map(|col| col[idx]).collect(),
        })
        .collect();

    Ok(records)
}

fn metric_series(name: &str, evaluations: &[RowEvaluation], pick: fn(&MassBalanceMetrics) -> Option<f64>) -> Series {
    let values: Vec<Option<f64>> = evaluations.iter().map(|e| pick(&e.metrics)).collect();
    Series::new(name.into(), values)
}

/// Normalize, coerce, compute and validate
///
/// Fails on schema problems; data problems end up in `issues`.
pub fn preprocess_input(raw: &RawDataset, uncertainty: f64) -> PipelineResult<PreprocessedData> {
    let source_name = raw.source_name.clone();
    let df = normalize_columns(raw.frame.clone())?;

    let names: Vec<String> = df.get_column_names().into_iter().map(|s| s.to_string()).collect();

    let missing = missing_required_columns(&names);
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns {
            columns: missing,
            source_name,
        });
    }

    let degradant_columns = detect_degradant_columns(&names);
    if degradant_columns.is_empty() {
        return Err(PipelineError::NoDegradantColumns { source_name });
    }
    info!("Degradant columns: {:?}", degradant_columns);

    let mut numeric_cols = vec![API_ASSAY.to_string(), TIME_MONTHS.to_string()];
    numeric_cols.extend(degradant_columns.iter().cloned());

    let df = coerce_numeric_columns(df, &numeric_cols)?;
    let mut df = drop_empty_rows(df)?;

    let records = extract_records(&df, &degradant_columns)?;
    let evaluations: Vec<RowEvaluation> = records
        .par_iter()
        .map(|record| evaluate_row(record, uncertainty))
        .collect();

    df.with_column(metric_series(TOTAL_DEGRADANTS, &evaluations, |m| Some(m.total_degradants)))?;
    df.with_column(metric_series(COL_AMB, &evaluations, |m| m.amb))?;
    df.with_column(metric_series(COL_AMBD, &evaluations, |m| m.ambd))?;
    df.with_column(metric_series(COL_RMB, &evaluations, |m| m.rmb))?;
    df.with_column(metric_series(COL_RMBD, &evaluations, |m| m.rmbd))?;
    df.with_column(metric_series(COL_Z_MB, &evaluations, |m| m.z_mb))?;

    let issues: Vec<IssueRecord> = evaluations
        .iter()
        .enumerate()
        .filter_map(|(row, eval)| IssueRecord::from_issues(row, &eval.issues))
        .collect();

    if !issues.is_empty() {
        warn!("{} of {} rows have data quality issues", issues.len(), records.len());
    }

    Ok(PreprocessedData {
        table: df,
        degradant_columns,
        records,
        evaluations,
        issues,
    })
}

/// Fully classified row, as shown to end users
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRow {
    pub row: usize,
    pub api_name: Option<String>,
    pub api_code: Option<String>,
    pub stress_type: Option<String>,
    pub time_months: Option<f64>,
    pub api_assay: Option<f64>,
    #[serde(flatten)]
    pub metrics: MassBalanceMetrics,
    pub interpretation: ZmbInterpretation,
    pub zone: DiagnosticZone,
    pub zone_label: String,
    pub action: &'static str,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct DiagnosticResults {
    pub source_name: String,
    /// Preprocessed table plus interpretation, zone and action columns
    pub table: DataFrame,
    pub degradant_columns: Vec<String>,
    pub rows: Vec<DiagnosticRow>,
    pub issues: Vec<IssueRecord>,
}

impl DiagnosticResults {
    /// Issues as a two-column table (Row, Issues)
    pub fn issues_table(&self) -> PipelineResult<DataFrame> {
        let rows: Vec<u64> = self.issues.iter().map(|i| i.row as u64).collect();
        let text: Vec<&str> = self.issues.iter().map(|i| i.issues.as_str()).collect();
        Ok(DataFrame::new(vec![
            Column::from(Series::new("Row".into(), rows)),
            Column::from(Series::new("Issues".into(), text)),
        ])?)
    }

    /// Curated subset of the enriched table with end-user headers
    pub fn display_table(&self) -> Result<DataFrame> {
        materialize_with_aliases(&self.table.clone().lazy(), &DISPLAY_COLUMNS, "display table")
    }

    /// Percentage of rows with |Z_MB| <= 2; `None` for an empty run
    pub fn share_within_variability(&self) -> Option<f64> {
        if self.rows.is_empty() {
            return None;
        }
        let within = self
            .rows
            .iter()
            .filter(|r| r.metrics.z_mb.is_some_and(|z| z.abs() <= Z_VARIABILITY_LIMIT))
            .count();
        Some(within as f64 / self.rows.len() as f64 * 100.0)
    }

    /// Row count per zone outcome, in `DiagnosticZone::ALL` order
    pub fn zone_counts(&self) -> Vec<(DiagnosticZone, usize)> {
        DiagnosticZone::ALL
            .iter()
            .map(|zone| (*zone, self.rows.iter().filter(|r| r.zone == *zone).count()))
            .collect()
    }
}

/// Main pipeline
pub struct DiagnosticPipeline {
    config: DiagnosticConfig,
}

impl DiagnosticPipeline {
    pub fn new(config: DiagnosticConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Run the complete transformation on one dataset
    pub fn run(&self, raw: &RawDataset) -> PipelineResult<DiagnosticResults> {
        info!("Running mass balance diagnostics on {}", raw.source_name);

        let pre = preprocess_input(raw, self.config.uncertainty)?;

        let rows: Vec<DiagnosticRow> = pre
            .records
            .par_iter()
            .zip(pre.evaluations.par_iter())
            .enumerate()
            .map(|(row, (record, eval))| {
                let zone = classify_zone(&ZoneInputs::from(&eval.metrics));
                DiagnosticRow {
                    row,
                    api_name: record.api_name.clone(),
                    api_code: record.api_code.clone(),
                    stress_type: record.stress_type.clone(),
                    time_months: record.time_months,
                    api_assay: record.api_assay,
                    metrics: eval.metrics,
                    interpretation: interpret_z_mb(eval.metrics.z_mb),
                    zone,
                    zone_label: zone.label(),
                    action: zone.recommended_action(),
                }
            })
            .collect();

        let mut table = pre.table;
        for name in [API_NAME, API_CODE] {
            if table.column(name).is_err() {
                table.with_column(Series::full_null(name.into(), table.height(), &DataType::String))?;
            }
        }

        let interpretations: Vec<&str> = rows.iter().map(|r| r.interpretation.label()).collect();
        let zones: Vec<&str> = rows.iter().map(|r| r.zone_label.as_str()).collect();
        let actions: Vec<&str> = rows.iter().map(|r| r.action).collect();
        table.with_column(Series::new(COL_INTERPRETATION.into(), interpretations))?;
        table.with_column(Series::new(COL_ZONE.into(), zones))?;
        table.with_column(Series::new(COL_ACTION.into(), actions))?;

        let results = DiagnosticResults {
            source_name: raw.source_name.clone(),
            table,
            degradant_columns: pre.degradant_columns,
            rows,
            issues: pre.issues,
        };

        for (zone, count) in results.zone_counts() {
            if count > 0 {
                info!("  {}: {} rows", zone, count);
            }
        }

        Ok(results)
    }
}
