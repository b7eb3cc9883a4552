//! Data types produced by the aggregation pipeline.
//!
//! Field order on the `Serialize` row types is the CSV column order.

use serde::Serialize;

use crate::analyzers::velocity::IsoWeekKey;
use crate::record::ContentType;

/// Overall engagement means across every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub avg_likes: f64,
    pub avg_comments: f64,
    pub avg_views: f64,
}

impl MetricsSummary {
    /// Rows for the `metric,value` table, in fixed order.
    pub fn rows(&self) -> [MetricRow; 3] {
        [
            MetricRow {
                metric: "avg_likes",
                value: self.avg_likes,
            },
            MetricRow {
                metric: "avg_comments",
                value: self.avg_comments,
            },
            MetricRow {
                metric: "avg_views",
                value: self.avg_views,
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: &'static str,
    pub value: f64,
}

/// Engagement means for one content category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMetrics {
    pub content_type: ContentType,
    pub likes: f64,
    pub comments: f64,
    pub views: f64,
}

/// Share of the collection held by one content category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    pub content_type: ContentType,
    pub share: f64,
    #[serde(skip)]
    pub count: usize,
}

/// Everything the aggregator produces for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementReport {
    pub total_records: usize,
    pub summary: MetricsSummary,
    pub by_type: Vec<TypeMetrics>,
    pub distribution: Vec<DistributionRow>,
}

/// Post count for one observed ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekBucket {
    pub year_week: IsoWeekKey,
    pub posts: usize,
}

/// Weekly posting cadence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocitySummary {
    /// Ascending by week. Only weeks with at least one post appear.
    pub weeks: Vec<WeekBucket>,
    pub avg_posts_per_week: f64,
}
