use crate::report::types::{fmt_opt, DiagnosticReport};
use crate::metrics::RiskBand;

/// HTML formatter for diagnostic reports
pub struct HtmlFormatter;

/// Minimal escaping for text cells taken from user data
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl HtmlFormatter {
    /// Format report as standalone HTML with embedded CSS and inline SVG charts
    pub fn format(report: &DiagnosticReport) -> String {
        let mut html = String::with_capacity(16384);

        // HTML header with CSS
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape(&report.title)));
        html.push_str("<style>\n");
        html.push_str("body { font-family: system-ui, sans-serif; max-width: 1200px; margin: 40px auto; padding: 20px; line-height: 1.6; }\n");
        html.push_str("h1 { color: #2c3e50; margin-bottom: 10px; }\n");
        html.push_str("h2 { color: #34495e; border-bottom: 2px solid #ecf0f1; padding-bottom: 5px; margin-top: 30px; }\n");
        html.push_str(".meta { color: #6c757d; }\n");
        html.push_str(".metric { font-size: 1.5em; font-weight: bold; color: #2c3e50; }\n");
        html.push_str(".charts { display: flex; flex-wrap: wrap; gap: 20px; }\n");
        html.push_str(".ok { background: #d4edda; border-left: 4px solid #28a745; padding: 15px; margin: 15px 0; border-radius: 4px; }\n");
        html.push_str(".warning { background: #fff3cd; border-left: 4px solid #ffc107; padding: 15px; margin: 15px 0; border-radius: 4px; }\n");
        html.push_str("table { width: 100%; border-collapse: collapse; margin: 16px 0; font-size: 0.9em; }\n");
        html.push_str("th { background: #34495e; color: white; text-align: left; padding: 8px; font-weight: 600; }\n");
        html.push_str("td { padding: 8px; border-bottom: 1px solid #ecf0f1; }\n");
        html.push_str("tr:hover { background: #f8f9fa; }\n");
        html.push_str(".band { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 6px; }\n");
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str(&format!("<h1>{}</h1>\n", escape(&report.title)));
        html.push_str(&format!(
            "<p class=\"meta\">Source: {} · Generated: {} · σ = {} · Degradant columns: {}</p>\n",
            escape(&report.source_name),
            report.generated_at,
            report.uncertainty,
            escape(&report.degradant_columns.join(", "))
        ));

        // Summary
        html.push_str("<h2>Results Within Analytical Variability</h2>\n");
        html.push_str(&format!(
            "<p class=\"metric\">{}%</p>\n",
            fmt_opt(report.summary.within_variability_pct, 1)
        ));
        html.push_str("<table>\n<thead><tr><th>Zone</th><th>Rows</th></tr></thead>\n<tbody>\n");
        for zc in &report.summary.zone_counts {
            html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", zc.label, zc.count));
        }
        html.push_str("</tbody>\n</table>\n");

        // Results
        html.push_str("<h2>Diagnostic Results</h2>\n");
        html.push_str("<table>\n<thead><tr>");
        for header in [
            "Row", "API Name", "API Code", "Stress Type", "Time (Months)", "API Assay (%)",
            "Total Degradants (%)", "AMB", "AMBD", "RMB", "RMBD", "Z_MB",
            "Z_MB Interpretation", "Diagnostic Zone", "Recommended Action",
        ] {
            html.push_str(&format!("<th>{}</th>", header));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &report.rows {
            let band = RiskBand::from_z_mb(row.metrics.z_mb);
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><span class=\"band\" style=\"background: {}\"></span>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                row.row,
                escape(row.api_name.as_deref().unwrap_or("")),
                escape(row.api_code.as_deref().unwrap_or("")),
                escape(row.stress_type.as_deref().unwrap_or("")),
                fmt_opt(row.time_months, 1),
                fmt_opt(row.api_assay, 2),
                row.metrics.total_degradants,
                fmt_opt(row.metrics.amb, 2),
                fmt_opt(row.metrics.ambd, 2),
                fmt_opt(row.metrics.rmb, 3),
                fmt_opt(row.metrics.rmbd, 3),
                band.color(),
                fmt_opt(row.metrics.z_mb, 2),
                row.interpretation.label(),
                row.zone_label,
                row.action
            ));
        }
        html.push_str("</tbody>\n</table>\n");

        // Data quality
        html.push_str("<h2>Data Quality</h2>\n");
        if report.issues.is_empty() {
            html.push_str("<div class=\"ok\"><p>No data quality issues detected.</p></div>\n");
        } else {
            html.push_str("<div class=\"warning\">\n");
            html.push_str("<table>\n<thead><tr><th>Row</th><th>Issues</th></tr></thead>\n<tbody>\n");
            for issue in &report.issues {
                html.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", issue.row, issue.issues));
            }
            html.push_str("</tbody>\n</table>\n</div>\n");
        }

        // Charts
        html.push_str("<h2>Visualizations</h2>\n");
        html.push_str("<div class=\"charts\">\n");
        html.push_str(&format!("<div>\n<h3>AMB–RMB Diagnostic Map</h3>\n{}</div>\n", report.charts.amb_rmb_map));
        html.push_str(&format!("<div>\n<h3>Z_MB Risk Indicator</h3>\n{}</div>\n", report.charts.z_mb_risk));
        html.push_str("</div>\n");

        // Reference tables
        html.push_str("<h2>Recommendation Matrix</h2>\n");
        html.push_str("<table>\n<thead><tr><th>AMB Range</th><th>RMB Range</th><th>Diagnostic Interpretation</th><th>Recommended Action</th></tr></thead>\n<tbody>\n");
        for rec in &report.recommendation_matrix {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(rec.amb_range),
                escape(rec.rmb_range),
                rec.interpretation,
                rec.action
            ));
        }
        html.push_str("</tbody>\n</table>\n");

        html.push_str("<h2>Comparative Analysis: Traditional vs Proposed</h2>\n");
        html.push_str("<table>\n<thead><tr><th>Criterion</th><th>Traditional Mass Balance</th><th>Proposed Diagnostic Framework</th></tr></thead>\n<tbody>\n");
        for cmp in &report.comparison {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                cmp.criterion, cmp.traditional, cmp.diagnostic
            ));
        }
        html.push_str("</tbody>\n</table>\n");

        html.push_str("</body>\n</html>\n");
        html
    }
}
