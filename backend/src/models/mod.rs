//! Domain models for the Channelstats analysis pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`ContentItem`] - One published item with its coerced metrics
//! - [`Category`] - Video, Short or LiveStream
//! - [`Record`] - A content item with its assigned category
//! - [`TotalRecord`] - The channel-wide total row of the export
//! - [`CategoryMetrics`] - Per-category rollup
//! - [`Metric`] - Numeric fields a ranking can sort by

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Category
// =============================================================================

/// Content category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Regular long-form upload (the default).
    Video,
    /// Short-form vertical content.
    Short,
    /// Recorded live broadcast.
    LiveStream,
}

impl Category {
    /// Every category, in summary display order.
    pub const ALL: [Category; 3] = [Category::Video, Category::Short, Category::LiveStream];

    /// Plural label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Video => "Videos",
            Self::Short => "Shorts",
            Self::LiveStream => "Live Streams",
        }
    }

    /// Parse a category from a user-supplied name.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "video" | "videos" => Some(Self::Video),
            "short" | "shorts" => Some(Self::Short),
            "live" | "livestream" | "livestreams" | "stream" => Some(Self::LiveStream),
            _ => None,
        }
    }
}

// =============================================================================
// Metric
// =============================================================================

/// A numeric field of a [`ContentItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Views,
    Subscribers,
    WatchTimeHours,
    Impressions,
    ImpressionsCtr,
    Duration,
}

impl Metric {
    /// Human label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Views => "Views",
            Self::Subscribers => "Subscribers",
            Self::WatchTimeHours => "Watch Time",
            Self::Impressions => "Impressions",
            Self::ImpressionsCtr => "CTR",
            Self::Duration => "Duration",
        }
    }

    /// Whether the metric is a percentage.
    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::ImpressionsCtr)
    }

    /// Parse a metric from a user-supplied name.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "views" => Some(Self::Views),
            "subscribers" | "subs" => Some(Self::Subscribers),
            "watchtime" | "watchtimehours" => Some(Self::WatchTimeHours),
            "impressions" => Some(Self::Impressions),
            "ctr" | "impressionsctr" => Some(Self::ImpressionsCtr),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }
}

// =============================================================================
// Content Item / Record
// =============================================================================

/// One published content item, with every numeric field already coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Position in the working table (after the total row is removed).
    pub row_index: usize,
    pub title: String,
    /// `None` when the date column is absent or unparseable.
    pub publish_date: Option<NaiveDate>,
    pub duration_seconds: f64,
    pub views: f64,
    pub subscribers_gained: f64,
    pub watch_time_hours: f64,
    pub impressions: f64,
    /// Percentage, e.g. `4.5` for 4.5%.
    pub impressions_ctr: f64,
}

impl ContentItem {
    /// Value of the given metric.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Views => self.views,
            Metric::Subscribers => self.subscribers_gained,
            Metric::WatchTimeHours => self.watch_time_hours,
            Metric::Impressions => self.impressions,
            Metric::ImpressionsCtr => self.impressions_ctr,
            Metric::Duration => self.duration_seconds,
        }
    }
}

/// A classified content item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(flatten)]
    pub item: ContentItem,
    pub category: Category,
}

/// Channel-wide totals taken from the export's "Total" row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRecord {
    pub subscribers_gained: f64,
}

// =============================================================================
// Category Metrics
// =============================================================================

/// Rollup of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetrics {
    pub published_count: usize,
    pub subscribers_gained: f64,
    pub watch_time_hours: f64,
    pub impressions: f64,
    /// Impressions-weighted mean CTR; `0` when there are no impressions.
    #[serde(rename = "weightedCTR")]
    pub weighted_ctr: f64,
    pub views: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_name() {
        assert_eq!(Category::from_name("Shorts"), Some(Category::Short));
        assert_eq!(Category::from_name("live-stream"), Some(Category::LiveStream));
        assert_eq!(Category::from_name(" videos "), Some(Category::Video));
        assert_eq!(Category::from_name("podcast"), None);
    }

    #[test]
    fn test_metric_from_name() {
        assert_eq!(Metric::from_name("watch_time"), Some(Metric::WatchTimeHours));
        assert_eq!(Metric::from_name("CTR"), Some(Metric::ImpressionsCtr));
        assert_eq!(Metric::from_name("likes"), None);
    }

    #[test]
    fn test_metrics_serialize_weighted_ctr_name() {
        let json = serde_json::to_value(CategoryMetrics::default()).unwrap();
        assert!(json.get("weightedCTR").is_some());
        assert!(json.get("publishedCount").is_some());
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record {
            item: ContentItem {
                row_index: 0,
                title: "Clip".into(),
                publish_date: None,
                duration_seconds: 30.0,
                views: 10.0,
                subscribers_gained: 1.0,
                watch_time_hours: 0.5,
                impressions: 100.0,
                impressions_ctr: 2.0,
            },
            category: Category::Short,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Clip");
        assert_eq!(json["category"], "Short");
    }
}
