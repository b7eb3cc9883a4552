//! ISO 8601 week bucketing of post creation times.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Serialize, Serializer};

use crate::analyzers::types::{VelocitySummary, WeekBucket};
use crate::analyzers::utility::mean_of_total;
use crate::record::NormalizedRecord;

/// An ISO (year, week) pair. Orders chronologically.
///
/// The year is the ISO week-numbering year, so 2024-12-30 is `2025-W01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeekKey {
    pub year: i32,
    pub week: u32,
}

impl IsoWeekKey {
    /// Buckets a UTC timestamp by its ISO week.
    pub fn from_datetime(ts: &DateTime<Utc>) -> Self {
        let iso = ts.iso_week();
        IsoWeekKey {
            year: iso.year(),
            week: iso.week(),
        }
    }
}

impl fmt::Display for IsoWeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl Serialize for IsoWeekKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Counts posts per observed ISO week.
///
/// Weeks with no posts between the first and last observed week are not
/// filled in. Returns `None` when there are no records.
pub fn bucket_weekly(records: &[NormalizedRecord]) -> Option<VelocitySummary> {
    let mut counts: BTreeMap<IsoWeekKey, usize> = BTreeMap::new();

    for record in records {
        *counts
            .entry(IsoWeekKey::from_datetime(&record.created_at))
            .or_default() += 1;
    }

    let avg_posts_per_week = mean_of_total(records.len() as u128, counts.len())?;

    let weeks = counts
        .into_iter()
        .map(|(year_week, posts)| WeekBucket { year_week, posts })
        .collect();

    Some(VelocitySummary {
        weeks,
        avg_posts_per_week,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(id: &str, y: i32, m: u32, d: u32) -> NormalizedRecord {
        NormalizedRecord::new(id, Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_year_boundary_uses_iso_year() {
        let records = vec![
            record_at("a", 2024, 12, 30),
            record_at("b", 2024, 12, 31),
            record_at("c", 2025, 1, 1),
        ];

        let summary = bucket_weekly(&records).unwrap();

        assert_eq!(summary.weeks.len(), 1);
        assert_eq!(summary.weeks[0].year_week.to_string(), "2025-W01");
        assert_eq!(summary.weeks[0].posts, 3);
        assert_eq!(summary.avg_posts_per_week, 3.0);
    }

    #[test]
    fn test_early_january_can_belong_to_previous_iso_year() {
        // 2021-01-03 is a Sunday in ISO week 53 of 2020
        let key = IsoWeekKey::from_datetime(&Utc.with_ymd_and_hms(2021, 1, 3, 23, 59, 59).unwrap());
        assert_eq!(key.to_string(), "2020-W53");

        let monday = IsoWeekKey::from_datetime(&Utc.with_ymd_and_hms(2021, 1, 4, 0, 0, 0).unwrap());
        assert_eq!(monday.to_string(), "2021-W01");
    }

    #[test]
    fn test_weeks_are_ascending_and_gaps_not_filled() {
        let records = vec![
            record_at("late", 2024, 3, 20),
            record_at("early", 2024, 1, 2),
            record_at("early2", 2024, 1, 3),
        ];

        let summary = bucket_weekly(&records).unwrap();
        let keys: Vec<_> = summary
            .weeks
            .iter()
            .map(|w| (w.year_week.to_string(), w.posts))
            .collect();

        assert_eq!(
            keys,
            vec![("2024-W01".to_string(), 2), ("2024-W12".to_string(), 1)]
        );
        assert_eq!(summary.avg_posts_per_week, 1.5);
    }

    #[test]
    fn test_keys_order_across_years() {
        let a = IsoWeekKey { year: 2024, week: 52 };
        let b = IsoWeekKey { year: 2025, week: 1 };
        assert!(a < b);
    }

    #[test]
    fn test_empty_records() {
        assert!(bucket_weekly(&[]).is_none());
    }

    #[test]
    fn test_permutation_invariant() {
        let mut records = vec![
            record_at("a", 2024, 5, 6),
            record_at("b", 2024, 5, 13),
            record_at("c", 2024, 5, 7),
            record_at("d", 2024, 8, 1),
        ];
        let forward = bucket_weekly(&records).unwrap();
        records.reverse();
        let backward = bucket_weekly(&records).unwrap();

        assert_eq!(forward, backward);
    }
}
