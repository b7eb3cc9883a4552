//! Run configuration passed explicitly to the loader and the report sink.

use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_FILE_PATTERN: &str = "*_metadata.json";
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Where to read metadata documents from and where to write tables to.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File-name pattern with at most one `*` wildcard.
    pub file_pattern: String,
    /// Maximum number of documents read at once.
    pub concurrency: usize,
}

impl PipelineConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// Sets the read concurrency. Zero is clamped to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        if concurrency == 0 {
            warn!("concurrency of 0 requested, using 1");
        }
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns true when `file_name` matches the configured pattern.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        match self.file_pattern.split_once('*') {
            Some((prefix, suffix)) => {
                file_name.len() >= prefix.len() + suffix.len()
                    && file_name.starts_with(prefix)
                    && file_name.ends_with(suffix)
            }
            None => file_name == self.file_pattern,
        }
    }
}
