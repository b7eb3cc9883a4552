//! JSON parser for per-video metadata documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::error::DocumentError;
use crate::record::{ContentFlags, NormalizedRecord};

const METADATA_KEY: &str = "video_metadata";

/// Decodes one metadata document into a [`NormalizedRecord`].
///
/// `id` and `time_created` are required. Engagement counters default to 0
/// when absent or `null`.
///
/// # Errors
///
/// Returns a [`DocumentError`] naming the offending field when the bytes are
/// not JSON, the nested metadata object is missing, or a field is unusable.
pub fn parse_document(bytes: &[u8]) -> Result<NormalizedRecord, DocumentError> {
    let doc: Value =
        serde_json::from_slice(bytes).map_err(|e| DocumentError::InvalidJson(e.to_string()))?;

    let meta = doc
        .get(METADATA_KEY)
        .and_then(Value::as_object)
        .ok_or(DocumentError::MissingMetadata)?;

    let id = parse_id(meta)?;
    let created_at = parse_created_at(meta)?;

    let likes = counter(meta, "diggcount")?;
    let comments = counter(meta, "commentcount")?;
    let views = counter(meta, "playcount")?;

    let flags = ContentFlags {
        image_post: flag(meta, "image_post"),
        is_ad: flag(meta, "is_ad"),
    };

    Ok(NormalizedRecord::new(id, created_at)
        .with_engagement(likes, comments, views)
        .with_flags(flags))
}

fn parse_id(meta: &Map<String, Value>) -> Result<String, DocumentError> {
    match meta.get("id") {
        None | Some(Value::Null) => Err(DocumentError::MissingField("id")),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        Some(other) => Err(DocumentError::InvalidField {
            field: "id",
            reason: format!("expected a non-empty string or integer, got {}", other),
        }),
    }
}

fn parse_created_at(meta: &Map<String, Value>) -> Result<DateTime<Utc>, DocumentError> {
    let invalid = |reason: String| DocumentError::InvalidField {
        field: "time_created",
        reason,
    };

    match meta.get("time_created") {
        None | Some(Value::Null) => Err(DocumentError::MissingField("time_created")),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| invalid(format!("epoch seconds out of range: {}", n))),
        Some(Value::String(s)) => {
            parse_timestamp(s).ok_or_else(|| invalid(format!("unrecognised timestamp {:?}", s)))
        }
        Some(other) => Err(invalid(format!("expected a string or number, got {}", other))),
    }
}

/// Parses the timestamp formats seen in collected metadata.
///
/// Naive date-times and bare dates are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if let Ok(secs) = value.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    None
}

fn counter(meta: &Map<String, Value>, field: &'static str) -> Result<u64, DocumentError> {
    let value = match meta.get(field) {
        None | Some(Value::Null) => return Ok(0),
        Some(value) => value,
    };

    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| DocumentError::InvalidField {
        field,
        reason: format!("expected a non-negative integer, got {}", value),
    })
}

/// A flag counts as set when its value is truthy: `true`, a non-zero number,
/// or a non-empty string, array or object.
fn flag(meta: &Map<String, Value>, field: &str) -> bool {
    match meta.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}
