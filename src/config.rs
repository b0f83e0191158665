//! Run configuration
//!
//! Defaults, then an optional JSON file, then environment variables.
//! The binary applies CLI flags on top of the result.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::error::PipelineError;

/// Combined analytical uncertainty (σ, % label claim) used for Z_MB.
pub const DEFAULT_UNCERTAINTY: f64 = 2.5;

pub const DEFAULT_OUTPUT_DIR: &str = "mass_balance_output";

/// Report renderings written by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Html,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

/// Encoding used for the enriched results table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    Csv,
    Parquet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticConfig {
    /// Divisor for Z_MB
    pub uncertainty: f64,
    pub output_dir: PathBuf,
    pub report_formats: Vec<ReportFormat>,
    pub table_format: TableFormat,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            uncertainty: DEFAULT_UNCERTAINTY,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            report_formats: vec![ReportFormat::Markdown, ReportFormat::Html, ReportFormat::Json],
            table_format: TableFormat::Csv,
        }
    }
}

impl DiagnosticConfig {
    /// Load configuration from JSON file
    ///
    /// Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: DiagnosticConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `MASS_BALANCE_UNCERTAINTY` and `MASS_BALANCE_OUTPUT_DIR` overrides
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var("MASS_BALANCE_UNCERTAINTY") {
            self.uncertainty = raw.trim().parse().with_context(|| {
                format!("MASS_BALANCE_UNCERTAINTY is not a number: {:?}", raw)
            })?;
        }

        if let Ok(dir) = std::env::var("MASS_BALANCE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.uncertainty.is_finite() || self.uncertainty <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "uncertainty must be a positive number, got {}",
                self.uncertainty
            )));
        }
        Ok(())
    }
}
