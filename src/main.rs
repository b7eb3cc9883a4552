//! CLI entry point for the engagement rater.
//!
//! Provides subcommands for the full batch run and for each individual table
//! group: content types, engagement metrics and posting velocity.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use engagement_rater::config::{DEFAULT_CONCURRENCY, DEFAULT_FILE_PATTERN, PipelineConfig};
use engagement_rater::error::PipelineError;
use engagement_rater::output::{CsvReportSink, print_json};
use engagement_rater::pipeline::{self, RunReport, Stage};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "engagement_rater")]
#[command(about = "Engagement and posting velocity tables from collected video metadata", long_about = None)]
struct Cli {
    /// Directory containing the per-video metadata documents
    #[arg(long, global = true, env = "ENGAGEMENT_INPUT_DIR", default_value = "data")]
    input_dir: PathBuf,

    /// Directory the CSV tables are written to
    #[arg(long, global = true, env = "ENGAGEMENT_OUTPUT_DIR", default_value = "data/reports")]
    output_dir: PathBuf,

    /// File-name pattern for metadata documents (one `*` wildcard)
    #[arg(long, global = true, env = "ENGAGEMENT_FILE_PATTERN", default_value = DEFAULT_FILE_PATTERN)]
    pattern: String,

    /// Maximum number of documents read concurrently
    #[arg(short, long, global = true, env = "ENGAGEMENT_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Also log the computed report as pretty JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, classify, aggregate and write every table
    Run,
    /// Classify documents and write content details and distribution
    ContentTypes,
    /// Compute overall and per-type engagement means
    Metrics {
        /// Read a previously written content_details.csv instead of the metadata directory
        #[arg(long, value_name = "CSV")]
        details: Option<PathBuf>,
    },
    /// Count posts per ISO week
    Velocity,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<PipelineError>() {
            Some(PipelineError::NoUsableData { .. }) => {
                error!(error = %e, "No usable data, no tables written");
                ExitCode::from(2)
            }
            _ => {
                error!(error = ?e, "Run failed");
                ExitCode::FAILURE
            }
        },
    }
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> WorkerGuard {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/engagement_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("engagement_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}

/// Filter from `var`, or `default` when the variable is unset or invalid.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

async fn execute(cli: Cli) -> Result<()> {
    let config = PipelineConfig::new(cli.input_dir, cli.output_dir)
        .with_file_pattern(cli.pattern)
        .with_concurrency(cli.concurrency);

    let report = match cli.command {
        Commands::Run => pipeline::run(&config, Stage::Full).await?,
        Commands::ContentTypes => pipeline::run(&config, Stage::ContentTypes).await?,
        Commands::Metrics {
            details: Some(details),
        } => {
            info!(details = %details.display(), "Computing metrics from content details");
            let report = pipeline::analyze_details(&details)?;
            let mut sink = CsvReportSink::create(&config.output_dir)?;
            pipeline::write_report(&report, &mut sink)?;
            report
        }
        Commands::Metrics { details: None } => pipeline::run(&config, Stage::Metrics).await?,
        Commands::Velocity => pipeline::run(&config, Stage::Velocity).await?,
    };

    if cli.json {
        log_report_json(&report)?;
    }

    Ok(())
}

fn log_report_json(report: &RunReport) -> Result<()> {
    if let Some(engagement) = &report.engagement {
        print_json(engagement)?;
    }
    if let Some(velocity) = &report.velocity {
        print_json(velocity)?;
    }
    Ok(())
}
