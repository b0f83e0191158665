//! Report generator
//!
//! Assembles a `DiagnosticReport` from pipeline results: summary numbers,
//! static reference tables and the two charts.

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::classification::RECOMMENDATION_MATRIX;
use crate::pipeline::DiagnosticResults;
use crate::report::charts::{amb_rmb_map, z_mb_risk};
use crate::report::types::{DiagnosticReport, ReportCharts, ReportSummary, ZoneCount, COMPARISON_TABLE};

pub const REPORT_TITLE: &str = "Mass Balance Diagnostic Report";

/// Round to one decimal, the precision of the headline percentage
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub struct ReportGenerator;

impl ReportGenerator {
    pub fn generate(results: &DiagnosticResults, uncertainty: f64) -> DiagnosticReport {
        let zone_counts = results
            .zone_counts()
            .into_iter()
            .map(|(zone, count)| ZoneCount {
                zone,
                label: zone.label(),
                count,
            })
            .collect();

        let summary = ReportSummary {
            total_rows: results.rows.len(),
            issue_rows: results.issues.len(),
            within_variability_pct: results.share_within_variability().map(round_one_decimal),
            zone_counts,
        };

        debug!("Rendering charts for {} rows", results.rows.len());
        let charts = ReportCharts {
            amb_rmb_map: amb_rmb_map(&results.rows),
            z_mb_risk: z_mb_risk(&results.rows),
        };

        DiagnosticReport {
            title: REPORT_TITLE.to_string(),
            source_name: results.source_name.clone(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            uncertainty,
            degradant_columns: results.degradant_columns.clone(),
            summary,
            rows: results.rows.clone(),
            issues: results.issues.clone(),
            recommendation_matrix: RECOMMENDATION_MATRIX.to_vec(),
            comparison: COMPARISON_TABLE.to_vec(),
            charts,
        }
    }
}
