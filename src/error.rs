//! Error types shared by the loader, the pipeline and the report sink.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single metadata document was skipped.
///
/// Never fatal: the loader records one of these per bad file and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("could not read file: {0}")]
    Io(String),
    #[error("not valid JSON: {0}")]
    InvalidJson(String),
    #[error("missing `video_metadata` object")]
    MissingMetadata,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("loader task failed: {0}")]
    TaskFailed(String),
}

/// Terminal conditions for a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no usable data in {dir} ({skipped} document(s) skipped)")]
    NoUsableData { dir: PathBuf, skipped: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_error_names_field() {
        let err = DocumentError::InvalidField {
            field: "diggcount",
            reason: "expected a non-negative integer".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid field `diggcount`: expected a non-negative integer"
        );
        assert_eq!(
            DocumentError::MissingField("id").to_string(),
            "missing required field `id`"
        );
    }

    #[test]
    fn test_no_usable_data_message() {
        let err = PipelineError::NoUsableData {
            dir: PathBuf::from("data"),
            skipped: 3,
        };
        assert_eq!(
            err.to_string(),
            "no usable data in data (3 document(s) skipped)"
        );
    }
}
