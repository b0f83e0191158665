use crate::report::types::{fmt_opt, DiagnosticReport};

/// Markdown formatter for diagnostic reports
pub struct MarkdownFormatter;

/// Make user text safe inside a table cell: `|` is escaped, line breaks become spaces
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

impl MarkdownFormatter {
    /// Format report as markdown
    pub fn format(report: &DiagnosticReport) -> String {
        let mut md = String::with_capacity(4096);

        md.push_str(&format!("# {}\n\n", report.title));
        md.push_str(&format!("**Source:** {}  \n", escape_cell(&report.source_name)));
        md.push_str(&format!("**Generated:** {}  \n", report.generated_at));
        md.push_str(&format!("**Analytical uncertainty (σ):** {}  \n", report.uncertainty));
        md.push_str(&format!("**Degradant columns:** {}\n\n", escape_cell(&report.degradant_columns.join(", "))));

        // Summary
        md.push_str("## Summary\n\n");
        md.push_str(&format!(
            "**Results Within Analytical Variability:** {}%\n\n",
            fmt_opt(report.summary.within_variability_pct, 1)
        ));
        md.push_str("| Zone | Rows |\n|---|---|\n");
        for zc in &report.summary.zone_counts {
            md.push_str(&format!("| {} | {} |\n", zc.label, zc.count));
        }
        md.push('\n');

        // Results
        md.push_str("## Diagnostic Results\n\n");
        md.push_str("| Row | API | Stress Type | Time (Months) | API Assay (%) | Total Degradants (%) | AMB | AMBD | RMB | RMBD | Z_MB | Z_MB Interpretation | Diagnostic Zone | Recommended Action |\n");
        md.push_str("|---|---|---|---|---|---|---|---|---|---|---|---|---|---|\n");
        for row in &report.rows {
            let api = match (&row.api_name, &row.api_code) {
                (Some(name), Some(code)) => format!("{} ({})", escape_cell(name), escape_cell(code)),
                (Some(name), None) => escape_cell(name),
                (None, Some(code)) => escape_cell(code),
                (None, None) => "–".to_string(),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {:.2} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                row.row,
                api,
                row.stress_type.as_deref().map(escape_cell).unwrap_or_else(|| "–".to_string()),
                fmt_opt(row.time_months, 1),
                fmt_opt(row.api_assay, 2),
                row.metrics.total_degradants,
                fmt_opt(row.metrics.amb, 2),
                fmt_opt(row.metrics.ambd, 2),
                fmt_opt(row.metrics.rmb, 3),
                fmt_opt(row.metrics.rmbd, 3),
                fmt_opt(row.metrics.z_mb, 2),
                row.interpretation.label(),
                row.zone_label,
                row.action
            ));
        }
        md.push('\n');

        // Data quality
        md.push_str("## Data Quality\n\n");
        if report.issues.is_empty() {
            md.push_str("✅ No data quality issues detected.\n\n");
        } else {
            md.push_str("| Row | Issues |\n|---|---|\n");
            for issue in &report.issues {
                md.push_str(&format!("| {} | {} |\n", issue.row, issue.issues));
            }
            md.push('\n');
        }

        // Reference tables
        md.push_str("## Recommendation Matrix\n\n");
        md.push_str("| AMB Range | RMB Range | Diagnostic Interpretation | Recommended Action |\n");
        md.push_str("|---|---|---|---|\n");
        for rec in &report.recommendation_matrix {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                rec.amb_range, rec.rmb_range, rec.interpretation, rec.action
            ));
        }
        md.push('\n');

        md.push_str("## Comparative Analysis: Traditional vs Proposed\n\n");
        md.push_str("| Criterion | Traditional Mass Balance | Proposed Diagnostic Framework |\n");
        md.push_str("|---|---|---|\n");
        for cmp in &report.comparison {
            md.push_str(&format!("| {} | {} | {} |\n", cmp.criterion, cmp.traditional, cmp.diagnostic));
        }
        md.push('\n');

        md.push_str("---\n\n");
        md.push_str("*Charts: amb_rmb_map.svg, z_mb_risk.svg*\n");

        md
    }
}
