//! Content-type heuristic.
//!
//! Rules are checked in table order and the first match wins. Flags in the
//! source data are not exclusive, so the order of [`RULES`] decides the
//! category of any record with more than one flag set. Image is checked
//! before ad; that ordering is an assumption carried over from the upstream
//! collection scripts and should be revisited if both flags turn out to be
//! meaningful together.

use crate::record::{ContentFlags, ContentType, NormalizedRecord};

/// A single classification rule.
pub struct Rule {
    pub name: &'static str,
    pub category: ContentType,
    pub matches: fn(&ContentFlags) -> bool,
}

/// Ordered rule list. First match wins.
pub static RULES: &[Rule] = &[
    Rule {
        name: "image_post",
        category: ContentType::Image,
        matches: is_image_post,
    },
    Rule {
        name: "is_ad",
        category: ContentType::Ad,
        matches: is_ad,
    },
];

fn is_image_post(flags: &ContentFlags) -> bool {
    flags.image_post
}

fn is_ad(flags: &ContentFlags) -> bool {
    flags.is_ad
}

/// Category used when no rule matches.
pub const DEFAULT_CATEGORY: ContentType = ContentType::Video;

/// Assigns a category to a record from its flags.
pub fn classify(record: &NormalizedRecord) -> ContentType {
    RULES
        .iter()
        .find(|rule| (rule.matches)(&record.flags))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Classifies every record, filling in `content_type`.
pub fn classify_all(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .map(|record| {
            let category = classify(&record);
            record.with_content_type(category)
        })
        .collect()
}
