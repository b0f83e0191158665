//! Pipeline error taxonomy
//!
//! Fatal failures only. Per-row data problems are reported through
//! `validation::IssueRecord` and undefined metrics are `None`, neither is an error.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Fatal error raised while loading or preprocessing a dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {reason}")]
    InputRead { path: String, reason: String },

    #[error("unsupported input format for {path} (expected .csv, .tsv, .txt, .xlsx, .xls or .ods)")]
    UnsupportedFormat { path: String },

    #[error("dataset is empty or unreadable: {source_name}")]
    EmptyDataset { source_name: String },

    #[error("missing required columns in {source_name}: {}", columns.join(", "))]
    MissingColumns {
        columns: Vec<String>,
        source_name: String,
    },

    #[error("no degradant columns detected in {source_name}")]
    NoDegradantColumns { source_name: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Table(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
