// Mass balance diagnostics CLI
//
// Usage:
//   cargo run --release --bin mass_balance -- --sample
//   cargo run --release --bin mass_balance -- --input forced_deg.xlsx --format html

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mass_balance_rust::config::{DiagnosticConfig, ReportFormat, TableFormat};
use mass_balance_rust::output::write_outputs;
use mass_balance_rust::{DiagnosticPipeline, RawDataset, ReportGenerator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Markdown,
    Html,
    Json,
    All,
}

impl FormatArg {
    fn report_formats(self) -> Vec<ReportFormat> {
        match self {
            FormatArg::Markdown => vec![ReportFormat::Markdown],
            FormatArg::Html => vec![ReportFormat::Html],
            FormatArg::Json => vec![ReportFormat::Json],
            FormatArg::All => vec![ReportFormat::Markdown, ReportFormat::Html, ReportFormat::Json],
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableFormatArg {
    Csv,
    Parquet,
}

impl From<TableFormatArg> for TableFormat {
    fn from(value: TableFormatArg) -> Self {
        match value {
            TableFormatArg::Csv => TableFormat::Csv,
            TableFormatArg::Parquet => TableFormat::Parquet,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "mass_balance",
    about = "Uncertainty-aware mass balance diagnostics for forced-degradation data",
    long_about = "Compute AMB, RMB and Z_MB for every row of a forced-degradation dataset, assign a diagnostic zone and recommended action, and write tables, reports and charts.",
    after_help = "Settings are resolved in order: defaults, --config file, MASS_BALANCE_* environment variables, then flags."
)]
#[command(group(ArgGroup::new("source").required(true).args(["sample", "input"])))]
struct Cli {
    #[arg(long, help = "Run on the bundled sample dataset")]
    sample: bool,
    #[arg(
        long,
        value_name = "FILE",
        help = "Dataset to analyse (.csv, .tsv, .txt, .xlsx, .xls, .ods)"
    )]
    input: Option<PathBuf>,
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        help = "Output directory [default: mass_balance_output]"
    )]
    output_dir: Option<PathBuf>,
    #[arg(long, value_enum, help = "Report format(s) to write [default: all]")]
    format: Option<FormatArg>,
    #[arg(
        long = "table-format",
        value_enum,
        help = "Encoding of the enriched results table [default: csv]"
    )]
    table_format: Option<TableFormatArg>,
    #[arg(long, help = "Combined analytical uncertainty (σ) for Z_MB [default: 2.5]")]
    uncertainty: Option<f64>,
    #[arg(long, value_name = "FILE", help = "Optional JSON configuration file")]
    config: Option<PathBuf>,
}

fn resolve_config(cli: &Cli) -> Result<DiagnosticConfig> {
    let config = match &cli.config {
        Some(path) => DiagnosticConfig::load(path)?,
        None => DiagnosticConfig::default(),
    };
    let mut config = config.with_env_overrides()?;

    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(format) = cli.format {
        config.report_formats = format.report_formats();
    }
    if let Some(table_format) = cli.table_format {
        config.table_format = table_format.into();
    }
    if let Some(uncertainty) = cli.uncertainty {
        config.uncertainty = uncertainty;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "mass_balance_rust=info,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    tracing::info!("Configuration:");
    tracing::info!("  uncertainty: {}", config.uncertainty);
    tracing::info!("  output_dir: {}", config.output_dir.display());
    tracing::info!("  table_format: {:?}", config.table_format);

    let start = Instant::now();

    let raw = match &cli.input {
        Some(path) => RawDataset::load(path)?,
        None => RawDataset::sample()?,
    };

    let pipeline = DiagnosticPipeline::new(config.clone())?;
    let results = pipeline
        .run(&raw)
        .with_context(|| format!("Diagnostics failed for {}", raw.source_name))?;
    let report = ReportGenerator::generate(&results, config.uncertainty);

    let written = write_outputs(&results, &report, &config)?;

    println!("\n{}", "=".repeat(70));
    println!("MASS BALANCE DIAGNOSTICS: {}", report.source_name);
    println!("{}", "=".repeat(70));
    println!("Rows evaluated: {}", report.summary.total_rows);
    println!("Rows with data quality issues: {}", report.summary.issue_rows);
    if let Some(pct) = report.summary.within_variability_pct {
        println!("Results within analytical variability: {:.1}%", pct);
    }
    for zc in &report.summary.zone_counts {
        if zc.count > 0 {
            println!("  {:<48} {:>5}", zc.label, zc.count);
        }
    }
    println!("\nOutputs:");
    for path in &written {
        println!("  {}", path.display());
    }
    println!("\nCompleted in {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);

    Ok(())
}
