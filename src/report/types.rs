use serde::Serialize;

use crate::classification::{DiagnosticZone, RecommendationRow};
use crate::pipeline::DiagnosticRow;
use crate::validation::IssueRecord;

/// Complete report for one diagnostic run
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub title: String,
    pub source_name: String,
    pub generated_at: String, // RFC 3339, UTC
    pub uncertainty: f64,
    pub degradant_columns: Vec<String>,
    pub summary: ReportSummary,
    pub rows: Vec<DiagnosticRow>,
    pub issues: Vec<IssueRecord>,
    pub recommendation_matrix: Vec<RecommendationRow>,
    pub comparison: Vec<ComparisonRow>,
    /// Inline SVG markup; kept out of the JSON output
    #[serde(skip)]
    pub charts: ReportCharts,
}

/// Headline numbers
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_rows: usize,
    pub issue_rows: usize,
    /// Share of rows with |Z_MB| <= 2, one decimal; `None` when there are no rows
    pub within_variability_pct: Option<f64>,
    pub zone_counts: Vec<ZoneCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneCount {
    pub zone: DiagnosticZone,
    pub label: String,
    pub count: usize,
}

/// One criterion of the traditional-vs-diagnostic comparison
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComparisonRow {
    pub criterion: &'static str,
    pub traditional: &'static str,
    pub diagnostic: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct ReportCharts {
    pub amb_rmb_map: String,
    pub z_mb_risk: String,
}

/// Traditional mass balance vs the diagnostic framework
pub static COMPARISON_TABLE: [ComparisonRow; 5] = [
    ComparisonRow {
        criterion: "Analytical variability considered",
        traditional: "No",
        diagnostic: "Yes (Z_MB)",
    },
    ComparisonRow {
        criterion: "Root-cause diagnosis",
        traditional: "No",
        diagnostic: "Yes (AMB–RMB zones)",
    },
    ComparisonRow {
        criterion: "False-positive investigations",
        traditional: "High",
        diagnostic: "Low",
    },
    ComparisonRow {
        criterion: "Decision consistency",
        traditional: "Low",
        diagnostic: "High",
    },
    ComparisonRow {
        criterion: "Regulatory defensibility",
        traditional: "Limited",
        diagnostic: "Strong (ICH-aligned)",
    },
];

/// Optional value formatted with fixed decimals, "–" when missing
pub fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "–".to_string(),
    }
}
