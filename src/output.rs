//! Output writer
//!
//! Writes one run into the output directory:
//! - `mass_balance_results.{csv,parquet}`: enriched table
//! - `display_table.csv`: curated columns with end-user headers
//! - `issues.csv`: per-row data quality issues
//! - `report.{md,html,json}`: one file per requested format
//! - `amb_rmb_map.svg`, `z_mb_risk.svg`

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{DiagnosticConfig, ReportFormat, TableFormat};
use crate::pipeline::DiagnosticResults;
use crate::report::{DiagnosticReport, HtmlFormatter, JsonFormatter, MarkdownFormatter};

pub const RESULTS_STEM: &str = "mass_balance_results";
pub const DISPLAY_FILE: &str = "display_table.csv";
pub const ISSUES_FILE: &str = "issues.csv";
pub const REPORT_STEM: &str = "report";
pub const AMB_RMB_CHART_FILE: &str = "amb_rmb_map.svg";
pub const Z_MB_CHART_FILE: &str = "z_mb_risk.svg";

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
    Ok(())
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .finish(df)
        .with_context(|| format!("Failed to write Parquet: {}", path.display()))?;
    Ok(())
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write every table, report and chart; returns the paths written
pub fn write_outputs(
    results: &DiagnosticResults,
    report: &DiagnosticReport,
    config: &DiagnosticConfig,
) -> Result<Vec<PathBuf>> {
    let dir = &config.output_dir;
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::new();

    let mut enriched = results.table.clone();
    let results_path = match config.table_format {
        TableFormat::Csv => {
            let path = dir.join(format!("{}.csv", RESULTS_STEM));
            write_csv(&mut enriched, &path)?;
            path
        }
        TableFormat::Parquet => {
            let path = dir.join(format!("{}.parquet", RESULTS_STEM));
            write_parquet(&mut enriched, &path)?;
            path
        }
    };
    written.push(results_path);

    let mut display = results.display_table()?;
    let display_path = dir.join(DISPLAY_FILE);
    write_csv(&mut display, &display_path)?;
    written.push(display_path);

    let mut issues = results.issues_table()?;
    let issues_path = dir.join(ISSUES_FILE);
    write_csv(&mut issues, &issues_path)?;
    written.push(issues_path);

    for format in &config.report_formats {
        let contents = match format {
            ReportFormat::Markdown => MarkdownFormatter::format(report),
            ReportFormat::Html => HtmlFormatter::format(report),
            ReportFormat::Json => JsonFormatter::format(report).context("Failed to serialize report")?,
        };
        let path = dir.join(format!("{}.{}", REPORT_STEM, format.extension()));
        write_text(&path, &contents)?;
        written.push(path);
    }

    for (name, svg) in [
        (AMB_RMB_CHART_FILE, &report.charts.amb_rmb_map),
        (Z_MB_CHART_FILE, &report.charts.z_mb_risk),
    ] {
        let path = dir.join(name);
        write_text(&path, svg)?;
        written.push(path);
    }

    info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawDataset;
    use crate::pipeline::DiagnosticPipeline;
    use crate::report::ReportGenerator;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mass_balance_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_write_all_outputs() {
        let config = DiagnosticConfig {
            output_dir: scratch_dir("all"),
            ..Default::default()
        };
        let raw = RawDataset::sample().unwrap();
        let results = DiagnosticPipeline::new(config.clone()).unwrap().run(&raw).unwrap();
        let report = ReportGenerator::generate(&results, config.uncertainty);

        let written = write_outputs(&results, &report, &config).unwrap();
        // 3 tables + 3 reports + 2 charts
        assert_eq!(written.len(), 8);
        for path in &written {
            assert!(path.exists(), "{} not written", path.display());
        }

        let issues = fs::read_to_string(config.output_dir.join(ISSUES_FILE)).unwrap();
        assert!(issues.starts_with("Row,Issues"));

        let display = fs::read_to_string(config.output_dir.join(DISPLAY_FILE)).unwrap();
        assert!(display.starts_with("API Name,API Code,Stress Type,Time (Months)"));

        fs::remove_dir_all(&config.output_dir).unwrap();
    }

    #[test]
    fn test_parquet_table_and_single_report() {
        let config = DiagnosticConfig {
            output_dir: scratch_dir("parquet"),
            report_formats: vec![ReportFormat::Json],
            table_format: TableFormat::Parquet,
            ..Default::default()
        };
        let raw = RawDataset::sample().unwrap();
        let results = DiagnosticPipeline::new(config.clone()).unwrap().run(&raw).unwrap();
        let report = ReportGenerator::generate(&results, config.uncertainty);

        let written = write_outputs(&results, &report, &config).unwrap();
        assert_eq!(written.len(), 6);
        assert!(config.output_dir.join("mass_balance_results.parquet").exists());
        assert!(config.output_dir.join("report.json").exists());
        assert!(!config.output_dir.join("report.md").exists());

        fs::remove_dir_all(&config.output_dir).unwrap();
    }
}
