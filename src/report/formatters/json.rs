use crate::report::types::DiagnosticReport;
use serde_json;

/// JSON formatter for diagnostic reports
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format report as pretty-printed JSON
    pub fn format(report: &DiagnosticReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    /// Format report as compact JSON (no whitespace)
    pub fn format_compact(report: &DiagnosticReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }
}
