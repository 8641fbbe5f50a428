//! Per-category rollups and reconciliation against the export's total row.
//!
//! The summary only covers items published in the reporting year; items
//! without a parseable date are left out of it (they still get classified
//! and ranked).

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Category, CategoryMetrics, Record, TotalRecord};

/// Headline figures for the reporting year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub reporting_year: i32,
    pub videos: CategoryMetrics,
    pub shorts: CategoryMetrics,
    pub live_streams: CategoryMetrics,
    pub total_published: usize,
    /// Total row subscribers, or the category sum without a total row.
    pub total_subscribers: f64,
    /// `total_subscribers` minus the category sum. May be negative.
    pub other_subscribers: f64,
    pub total_row_present: bool,
    /// Items excluded from the summary for lacking a date.
    pub undated_records: usize,
}

impl Summary {
    pub fn metrics(&self, category: Category) -> &CategoryMetrics {
        match category {
            Category::Video => &self.videos,
            Category::Short => &self.shorts,
            Category::LiveStream => &self.live_streams,
        }
    }

    /// Sum of subscribers over the three categories.
    pub fn classified_subscribers(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|c| self.metrics(*c).subscribers_gained)
            .sum()
    }
}

/// Roll up one group of records.
pub fn rollup<'a, I>(records: I) -> CategoryMetrics
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut metrics = CategoryMetrics::default();
    let mut weighted_ctr_sum = 0.0;

    for record in records {
        let item = &record.item;
        metrics.published_count += 1;
        metrics.subscribers_gained += item.subscribers_gained;
        metrics.watch_time_hours += item.watch_time_hours;
        metrics.impressions += item.impressions;
        metrics.views += item.views;
        weighted_ctr_sum += item.impressions_ctr * item.impressions;
    }

    metrics.weighted_ctr = if metrics.impressions > 0.0 {
        weighted_ctr_sum / metrics.impressions
    } else {
        0.0
    };
    metrics
}

/// Records published in `year`.
pub fn year_view(records: &[Record], year: i32) -> Vec<&Record> {
    records
        .iter()
        .filter(|r| r.item.publish_date.is_some_and(|d| d.year() == year))
        .collect()
}

/// Rollup of one category within a record set.
pub fn category_metrics(records: &[&Record], category: Category) -> CategoryMetrics {
    rollup(records.iter().copied().filter(|r| r.category == category))
}

/// Channel total and the unclassified remainder, unclamped.
pub fn reconcile(classified_subscribers: f64, total: Option<&TotalRecord>) -> (f64, f64) {
    let channel = total.map_or(classified_subscribers, |t| t.subscribers_gained);
    (channel, channel - classified_subscribers)
}

/// Build the reporting-year summary.
pub fn summarize(records: &[Record], total: Option<&TotalRecord>, year: i32) -> Summary {
    let view = year_view(records, year);

    let videos = category_metrics(&view, Category::Video);
    let shorts = category_metrics(&view, Category::Short);
    let live_streams = category_metrics(&view, Category::LiveStream);

    let classified = videos.subscribers_gained + shorts.subscribers_gained + live_streams.subscribers_gained;
    let (total_subscribers, other_subscribers) = reconcile(classified, total);

    Summary {
        reporting_year: year,
        total_published: videos.published_count + shorts.published_count + live_streams.published_count,
        videos,
        shorts,
        live_streams,
        total_subscribers,
        other_subscribers,
        total_row_present: total.is_some(),
        undated_records: records.iter().filter(|r| r.item.publish_date.is_none()).count(),
    }
}
