//! Flat per-video records produced by the loader.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of content categories.
///
/// Variant order is the label order used when tables are sorted by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Ad,
    Image,
    Video,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Ad => "ad",
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-standard content markers carried over from the source document.
///
/// The producer does not keep these mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentFlags {
    pub image_post: bool,
    pub is_ad: bool,
}

/// One metadata document reduced to the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
    pub flags: ContentFlags,
    /// Filled in by the classifier.
    pub content_type: Option<ContentType>,
}

impl NormalizedRecord {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        NormalizedRecord {
            id: id.into(),
            created_at,
            likes: 0,
            comments: 0,
            views: 0,
            flags: ContentFlags::default(),
            content_type: None,
        }
    }

    /// Set the engagement counters (likes, comments, views).
    pub fn with_engagement(mut self, likes: u64, comments: u64, views: u64) -> Self {
        self.likes = likes;
        self.comments = comments;
        self.views = views;
        self
    }

    pub fn with_flags(mut self, flags: ContentFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_content_type_labels() {
        assert_eq!(ContentType::Ad.to_string(), "ad");
        assert_eq!(ContentType::Image.to_string(), "image");
        assert_eq!(ContentType::Video.to_string(), "video");
    }

    #[test]
    fn test_content_type_orders_by_label() {
        let mut types = vec![ContentType::Video, ContentType::Ad, ContentType::Image];
        types.sort();
        assert_eq!(
            types,
            vec![ContentType::Ad, ContentType::Image, ContentType::Video]
        );
    }

    #[test]
    fn test_new_record_defaults_counters_to_zero() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = NormalizedRecord::new("7301", ts);

        assert_eq!(record.likes, 0);
        assert_eq!(record.comments, 0);
        assert_eq!(record.views, 0);
        assert_eq!(record.flags, ContentFlags::default());
        assert!(record.content_type.is_none());
    }
}
