//! Mass Balance Diagnostics
//!
//! Uncertainty-aware mass balance evaluation for forced-degradation studies.
//!
//! For every row of a stress-testing dataset (API assay plus measured
//! degradants) the crate computes AMB/AMBD/RMB/RMBD and the
//! uncertainty-normalized Z_MB, assigns one of the diagnostic zones, and
//! attaches a recommended action.
//!
//! Layout:
//! - `data`: loading delimited text and spreadsheets with Polars / calamine
//! - `utils/`: column normalization, degradant detection, numeric coercion
//! - `metrics/`: mass balance and uncertainty functions
//! - `validation`: per-row data quality checks
//! - `classification/`: zone rules and recommended actions
//! - `pipeline`: end-to-end transformation of one dataset
//! - `report/`: report model, SVG charts, Markdown/HTML/JSON formatters
//! - `output`: writes tables, reports and charts to the output directory

pub mod error;
pub mod config;
pub mod data;
pub mod utils;
pub mod metrics;
pub mod validation;
pub mod classification;
pub mod pipeline;
pub mod report;
pub mod output;

// Re-export commonly used types
pub use error::{PipelineError, PipelineResult};
pub use config::{DiagnosticConfig, ReportFormat, TableFormat};
pub use data::{InputFormat, RawDataset};
pub use classification::{classify_zone, recommended_action, DiagnosticZone};
pub use pipeline::{preprocess_input, DiagnosticPipeline, DiagnosticResults, DiagnosticRow};
pub use report::{DiagnosticReport, ReportGenerator};
pub use metrics::*;
