//! Output formatting and persistence for the report tables.
//!
//! The pipeline talks to a [`ReportSink`]; [`CsvReportSink`] writes one CSV
//! file per table into the output directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analyzers::types::{DistributionRow, MetricsSummary, TypeMetrics, VelocitySummary};
use crate::classifier::classify;
use crate::error::PipelineError;
use crate::record::{ContentFlags, ContentType, NormalizedRecord};

pub const METRICS_SUMMARY_FILE: &str = "metrics_summary.csv";
pub const METRICS_BY_TYPE_FILE: &str = "metrics_by_type.csv";
pub const CONTENT_DISTRIBUTION_FILE: &str = "content_distribution.csv";
pub const VELOCITY_SUMMARY_FILE: &str = "velocity_summary.csv";
pub const CONTENT_DETAILS_FILE: &str = "content_details.csv";

/// Destination for the produced tables.
pub trait ReportSink {
    fn write_metrics_summary(&mut self, summary: &MetricsSummary) -> Result<(), PipelineError>;
    fn write_metrics_by_type(&mut self, rows: &[TypeMetrics]) -> Result<(), PipelineError>;
    fn write_distribution(&mut self, rows: &[DistributionRow]) -> Result<(), PipelineError>;
    fn write_velocity(&mut self, summary: &VelocitySummary) -> Result<(), PipelineError>;
    fn write_content_details(
        &mut self,
        records: &[NormalizedRecord],
    ) -> Result<(), PipelineError>;
}

/// One row of `content_details.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDetailRow {
    pub id: String,
    pub time_created: DateTime<Utc>,
    pub content_type: ContentType,
    pub likes: u64,
    pub comments: u64,
    pub views: u64,
}

impl ContentDetailRow {
    pub fn from_record(record: &NormalizedRecord, content_type: ContentType) -> Self {
        ContentDetailRow {
            id: record.id.clone(),
            time_created: record.created_at,
            content_type,
            likes: record.likes,
            comments: record.comments,
            views: record.views,
        }
    }
}

impl From<ContentDetailRow> for NormalizedRecord {
    /// Flags are rebuilt from the stored category so reclassifying agrees with it.
    fn from(row: ContentDetailRow) -> Self {
        let flags = ContentFlags {
            image_post: row.content_type == ContentType::Image,
            is_ad: row.content_type == ContentType::Ad,
        };
        NormalizedRecord::new(row.id, row.time_created)
            .with_engagement(row.likes, row.comments, row.views)
            .with_flags(flags)
            .with_content_type(row.content_type)
    }
}

/// Writes each table as a CSV file in a directory, replacing earlier runs.
pub struct CsvReportSink {
    dir: PathBuf,
}

impl CsvReportSink {
    /// Creates the output directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(CsvReportSink { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_table<T, I>(&self, file_name: &str, rows: I) -> Result<(), PipelineError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let path = self.dir.join(file_name);
        let mut writer = WriterBuilder::new().has_headers(true).from_path(&path)?;

        let mut count = 0usize;
        for row in rows {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = count, "Table written");
        Ok(())
    }
}

impl ReportSink for CsvReportSink {
    fn write_metrics_summary(&mut self, summary: &MetricsSummary) -> Result<(), PipelineError> {
        self.write_table(METRICS_SUMMARY_FILE, summary.rows())
    }

    fn write_metrics_by_type(&mut self, rows: &[TypeMetrics]) -> Result<(), PipelineError> {
        self.write_table(METRICS_BY_TYPE_FILE, rows)
    }

    fn write_distribution(&mut self, rows: &[DistributionRow]) -> Result<(), PipelineError> {
        self.write_table(CONTENT_DISTRIBUTION_FILE, rows)
    }

    fn write_velocity(&mut self, summary: &VelocitySummary) -> Result<(), PipelineError> {
        self.write_table(VELOCITY_SUMMARY_FILE, &summary.weeks)
    }

    fn write_content_details(
        &mut self,
        records: &[NormalizedRecord],
    ) -> Result<(), PipelineError> {
        let mut rows: Vec<ContentDetailRow> = records
            .iter()
            .map(|r| {
                let content_type = r.content_type.unwrap_or_else(|| classify(r));
                ContentDetailRow::from_record(r, content_type)
            })
            .collect();
        rows.sort_by(|a, b| {
            a.time_created
                .cmp(&b.time_created)
                .then_with(|| a.id.cmp(&b.id))
        });
        self.write_table(CONTENT_DETAILS_FILE, rows)
    }
}

/// Reads a previously written `content_details.csv` back into records.
pub fn load_details(path: &Path) -> Result<Vec<NormalizedRecord>, PipelineError> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let row: ContentDetailRow = result?;
        records.push(row.into());
    }

    debug!(path = %path.display(), rows = records.len(), "Content details loaded");
    Ok(records)
}

/// Logs any report value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), PipelineError> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::WeekBucket;
    use crate::analyzers::velocity::IsoWeekKey;
    use chrono::TimeZone;

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn test_metrics_summary_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::create(dir.path().join("reports")).unwrap();

        let summary = MetricsSummary {
            avg_likes: 12.5,
            avg_comments: 3.0,
            avg_views: 1000.0,
        };
        sink.write_metrics_summary(&summary).unwrap();

        let content = read(sink.dir(), METRICS_SUMMARY_FILE);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "metric,value",
                "avg_likes,12.5",
                "avg_comments,3.0",
                "avg_views,1000.0"
            ]
        );
    }

    #[test]
    fn test_distribution_has_no_count_column() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::create(dir.path()).unwrap();

        let rows = vec![
            DistributionRow {
                content_type: ContentType::Image,
                share: 0.75,
                count: 3,
            },
            DistributionRow {
                content_type: ContentType::Video,
                share: 0.25,
                count: 1,
            },
        ];
        sink.write_distribution(&rows).unwrap();

        let content = read(dir.path(), CONTENT_DISTRIBUTION_FILE);
        assert_eq!(content, "content_type,share\nimage,0.75\nvideo,0.25\n");
    }

    #[test]
    fn test_velocity_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::create(dir.path()).unwrap();

        let summary = VelocitySummary {
            weeks: vec![
                WeekBucket {
                    year_week: IsoWeekKey { year: 2024, week: 9 },
                    posts: 4,
                },
                WeekBucket {
                    year_week: IsoWeekKey { year: 2025, week: 1 },
                    posts: 2,
                },
            ],
            avg_posts_per_week: 3.0,
        };
        sink.write_velocity(&summary).unwrap();

        let content = read(dir.path(), VELOCITY_SUMMARY_FILE);
        assert_eq!(content, "year_week,posts\n2024-W09,4\n2025-W01,2\n");
    }

    #[test]
    fn test_rewrite_replaces_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::create(dir.path()).unwrap();

        let rows = vec![TypeMetrics {
            content_type: ContentType::Ad,
            likes: 1.0,
            comments: 2.0,
            views: 3.0,
        }];
        sink.write_metrics_by_type(&rows).unwrap();
        sink.write_metrics_by_type(&rows).unwrap();

        let content = read(dir.path(), METRICS_BY_TYPE_FILE);
        assert_eq!(content, "content_type,likes,comments,views\nad,1.0,2.0,3.0\n");
    }

    #[test]
    fn test_content_details_are_sorted_and_reloadable() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::create(dir.path()).unwrap();

        let later = NormalizedRecord::new("b", Utc.with_ymd_and_hms(2024, 7, 2, 0, 0, 0).unwrap())
            .with_engagement(5, 1, 50)
            .with_content_type(ContentType::Ad);
        let earlier =
            NormalizedRecord::new("a", Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap())
                .with_engagement(9, 0, 90)
                .with_content_type(ContentType::Image);
        sink.write_content_details(&[later.clone(), earlier.clone()])
            .unwrap();

        let content = read(dir.path(), CONTENT_DETAILS_FILE);
        let header = content.lines().next().unwrap();
        assert_eq!(header, "id,time_created,content_type,likes,comments,views");

        let reloaded = load_details(&dir.path().join(CONTENT_DETAILS_FILE)).unwrap();
        let ids: Vec<_> = reloaded.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(reloaded[0].content_type, Some(ContentType::Image));
        assert!(reloaded[0].flags.image_post);
        assert_eq!(reloaded[1].created_at, later.created_at);
        assert_eq!(reloaded[1].views, 50);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let summary = MetricsSummary {
            avg_likes: 1.0,
            avg_comments: 2.0,
            avg_views: 3.0,
        };
        print_json(&summary).unwrap();
    }
}
