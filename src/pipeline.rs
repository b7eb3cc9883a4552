//! One-shot batch run: load, classify, aggregate, bucket, write.

use std::path::Path;

use tracing::info;

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::types::{EngagementReport, VelocitySummary};
use crate::analyzers::velocity::bucket_weekly;
use crate::classifier::classify_all;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::loader::{SkippedDocument, load_records};
use crate::output::{CsvReportSink, ReportSink, load_details};
use crate::record::NormalizedRecord;

/// Which tables a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Every table.
    Full,
    /// `content_details` and `content_distribution`.
    ContentTypes,
    /// `metrics_summary` and `metrics_by_type`.
    Metrics,
    /// `velocity_summary`.
    Velocity,
}

impl Stage {
    fn needs_classification(self) -> bool {
        !matches!(self, Stage::Velocity)
    }

    fn needs_velocity(self) -> bool {
        matches!(self, Stage::Full | Stage::Velocity)
    }
}

/// Everything computed during one run.
#[derive(Debug)]
pub struct RunReport {
    pub stage: Stage,
    /// Classified unless the stage is [`Stage::Velocity`].
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<SkippedDocument>,
    pub engagement: Option<EngagementReport>,
    pub velocity: Option<VelocitySummary>,
}

/// Computes the report for an already loaded set of records.
///
/// Returns `None` when `records` is empty.
pub fn analyze_records(records: Vec<NormalizedRecord>, stage: Stage) -> Option<RunReport> {
    if records.is_empty() {
        return None;
    }

    let records = if stage.needs_classification() {
        classify_all(records)
    } else {
        records
    };

    let engagement = if stage.needs_classification() {
        aggregate(&records)
    } else {
        None
    };
    let velocity = if stage.needs_velocity() {
        bucket_weekly(&records)
    } else {
        None
    };

    Some(RunReport {
        stage,
        records,
        skipped: Vec::new(),
        engagement,
        velocity,
    })
}

/// Loads the input directory and computes the report.
///
/// # Errors
///
/// [`PipelineError::NoUsableData`] when no document yields a record.
#[tracing::instrument(skip(config), fields(input_dir = %config.input_dir.display()))]
pub async fn analyze(config: &PipelineConfig, stage: Stage) -> Result<RunReport, PipelineError> {
    let load = load_records(config).await?;
    let skipped = load.skipped;

    let mut report =
        analyze_records(load.records, stage).ok_or_else(|| PipelineError::NoUsableData {
            dir: config.input_dir.clone(),
            skipped: skipped.len(),
        })?;
    report.skipped = skipped;
    Ok(report)
}

/// Computes metrics from a previously written `content_details.csv`.
pub fn analyze_details(path: &Path) -> Result<RunReport, PipelineError> {
    let records = load_details(path)?;
    analyze_records(records, Stage::Metrics).ok_or_else(|| PipelineError::NoUsableData {
        dir: path.to_path_buf(),
        skipped: 0,
    })
}

/// Writes the tables belonging to the report's stage.
pub fn write_report(report: &RunReport, sink: &mut dyn ReportSink) -> Result<(), PipelineError> {
    let stage = report.stage;

    if let Some(engagement) = &report.engagement {
        if matches!(stage, Stage::Full | Stage::Metrics) {
            sink.write_metrics_summary(&engagement.summary)?;
            sink.write_metrics_by_type(&engagement.by_type)?;
        }
        if matches!(stage, Stage::Full | Stage::ContentTypes) {
            sink.write_distribution(&engagement.distribution)?;
            sink.write_content_details(&report.records)?;
        }
    }

    if let Some(velocity) = &report.velocity {
        sink.write_velocity(velocity)?;
        info!(
            weeks = velocity.weeks.len(),
            avg_posts_per_week = velocity.avg_posts_per_week,
            "Posting velocity computed"
        );
    }

    Ok(())
}

/// Full batch run against the configured directories.
///
/// The output directory is only created once there is data to write.
pub async fn run(config: &PipelineConfig, stage: Stage) -> Result<RunReport, PipelineError> {
    let report = analyze(config, stage).await?;

    let mut sink = CsvReportSink::create(&config.output_dir)?;
    write_report(&report, &mut sink)?;

    info!(
        records = report.records.len(),
        skipped = report.skipped.len(),
        output_dir = %config.output_dir.display(),
        "Run complete"
    );
    Ok(report)
}
