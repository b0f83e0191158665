//! Report layer
//!
//! - `types`: serializable report model plus the static comparison table
//! - `generator`: builds a report from pipeline results
//! - `charts`: AMB–RMB map and Z_MB risk bars as SVG
//! - `formatters`: Markdown, HTML and JSON renderings

pub mod types;
pub mod charts;
pub mod generator;
pub mod formatters;

pub use types::{ComparisonRow, DiagnosticReport, ReportCharts, ReportSummary, ZoneCount, COMPARISON_TABLE};
pub use charts::{amb_rmb_map, z_mb_risk};
pub use generator::{ReportGenerator, REPORT_TITLE};
pub use formatters::{HtmlFormatter, JsonFormatter, MarkdownFormatter};

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::DiagnosticConfig;
    use crate::data::{InputFormat, RawDataset};
    use crate::pipeline::DiagnosticPipeline;

    /// Report over four rows, one per reference scenario
    pub fn sample_report() -> DiagnosticReport {
        let csv = "API Name,Stress Type,Time,API Assay,Degradant A\n\
                   Drug,Control,0,99.0,1.0\n\
                   Drug,Acid,1,90.0,2.0\n\
                   Drug,Thermal,1,95.0,4.0\n\
                   Drug,Photolytic,1,105.0,3.0\n";
        let raw = RawDataset::from_bytes(csv.as_bytes().to_vec(), InputFormat::Delimited { separator: b',' }, "scenarios.csv")
            .unwrap();
        let results = DiagnosticPipeline::new(DiagnosticConfig::default()).unwrap().run(&raw).unwrap();
        ReportGenerator::generate(&results, 2.5)
    }
}
