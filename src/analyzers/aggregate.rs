use std::collections::BTreeMap;

use crate::analyzers::types::{DistributionRow, EngagementReport, MetricsSummary, TypeMetrics};
use crate::analyzers::utility::{mean_of_total, share};
use crate::classifier::classify;
use crate::record::{ContentType, NormalizedRecord};

/// Exact running totals for one group of records.
#[derive(Debug, Default, Clone, Copy)]
struct EngagementTotals {
    count: usize,
    likes: u128,
    comments: u128,
    views: u128,
}

impl EngagementTotals {
    fn add(&mut self, record: &NormalizedRecord) {
        self.count += 1;
        self.likes += record.likes as u128;
        self.comments += record.comments as u128;
        self.views += record.views as u128;
    }

    fn means(&self) -> Option<MetricsSummary> {
        Some(MetricsSummary {
            avg_likes: mean_of_total(self.likes, self.count)?,
            avg_comments: mean_of_total(self.comments, self.count)?,
            avg_views: mean_of_total(self.views, self.count)?,
        })
    }
}

/// Records without a category yet are classified on the fly.
fn category_of(record: &NormalizedRecord) -> ContentType {
    record.content_type.unwrap_or_else(|| classify(record))
}

fn totals_by_type(records: &[NormalizedRecord]) -> BTreeMap<ContentType, EngagementTotals> {
    let mut groups: BTreeMap<ContentType, EngagementTotals> = BTreeMap::new();
    for record in records {
        groups.entry(category_of(record)).or_default().add(record);
    }
    groups
}

/// Mean likes, comments and views across all records.
///
/// Returns `None` when there are no records.
pub fn summarize(records: &[NormalizedRecord]) -> Option<MetricsSummary> {
    let mut totals = EngagementTotals::default();
    for record in records {
        totals.add(record);
    }
    totals.means()
}

/// Per-category engagement means, ordered by category label.
///
/// Categories with no records have no row.
pub fn metrics_by_type(records: &[NormalizedRecord]) -> Vec<TypeMetrics> {
    totals_by_type(records)
        .into_iter()
        .filter_map(|(content_type, totals)| {
            let means = totals.means()?;
            Some(TypeMetrics {
                content_type,
                likes: means.avg_likes,
                comments: means.avg_comments,
                views: means.avg_views,
            })
        })
        .collect()
}

/// Share of records per category, largest share first.
///
/// Ties are ordered by category label. Shares of the returned rows sum to 1.
pub fn content_distribution(records: &[NormalizedRecord]) -> Vec<DistributionRow> {
    let total = records.len();

    let mut rows: Vec<DistributionRow> = totals_by_type(records)
        .into_iter()
        .filter_map(|(content_type, totals)| {
            Some(DistributionRow {
                content_type,
                share: share(totals.count, total)?,
                count: totals.count,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.content_type.cmp(&b.content_type))
    });
    rows
}

/// Computes every engagement table for a set of classified records.
///
/// Returns `None` when there are no records.
pub fn aggregate(records: &[NormalizedRecord]) -> Option<EngagementReport> {
    Some(EngagementReport {
        total_records: records.len(),
        summary: summarize(records)?,
        by_type: metrics_by_type(records),
        distribution: content_distribution(records),
    })
}
