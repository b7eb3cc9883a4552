//! Reads metadata documents from the input directory.
//!
//! Each candidate file is read and parsed on its own task. A file that fails
//! for any reason becomes a [`SkippedDocument`] and never affects its
//! siblings.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{Instrument, debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{DocumentError, PipelineError};
use crate::parser::parse_document;
use crate::record::NormalizedRecord;

/// A candidate file that did not yield a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: DocumentError,
}

/// Outcome of one loader pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<NormalizedRecord>,
    /// Sorted by path.
    pub skipped: Vec<SkippedDocument>,
}

impl LoadReport {
    pub fn candidates(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Lists files in the input directory that match the configured pattern.
///
/// Subdirectories are not searched. The result is sorted.
pub fn candidate_files(config: &PipelineConfig) -> Result<Vec<PathBuf>, PipelineError> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(&config.input_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if config.matches_file_name(name) {
                paths.push(path);
            }
        }
    }

    paths.sort();
    Ok(paths)
}

/// Loads every candidate document, reading up to `config.concurrency` files at once.
///
/// # Errors
///
/// Only fails when the input directory itself cannot be listed. Per-file
/// problems are reported in [`LoadReport::skipped`].
#[tracing::instrument(skip(config), fields(input_dir = %config.input_dir.display(), pattern = %config.file_pattern))]
pub async fn load_records(config: &PipelineConfig) -> Result<LoadReport, PipelineError> {
    let paths = candidate_files(config)?;
    debug!(candidates = paths.len(), "Candidate documents found");

    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let mut tasks = Vec::with_capacity(paths.len());

    for path in paths {
        let span = tracing::debug_span!("load_document", path = %path.display());
        let task = tokio::spawn(load_document(path.clone(), semaphore.clone()).instrument(span));
        tasks.push((path, task));
    }

    let mut report = LoadReport::default();

    for (path, task) in tasks {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(DocumentError::TaskFailed(e.to_string())),
        };

        match outcome {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                warn!(file = %display_name(&path), reason = %reason, "Skipping metadata document");
                report.skipped.push(SkippedDocument { path, reason });
            }
        }
    }

    info!(
        candidates = report.candidates(),
        loaded = report.records.len(),
        skipped = report.skipped.len(),
        "Metadata documents loaded"
    );
    Ok(report)
}

async fn load_document(
    path: PathBuf,
    semaphore: Arc<Semaphore>,
) -> Result<NormalizedRecord, DocumentError> {
    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| DocumentError::TaskFailed(e.to_string()))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| DocumentError::Io(e.to_string()))?;

    let record = parse_document(&bytes)?;
    debug!(id = %record.id, created_at = %record.created_at, "Document parsed");
    Ok(record)
}

/// Returns the file name of `path` for diagnostics, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
