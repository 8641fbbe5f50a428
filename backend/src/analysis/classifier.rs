//! Content classification.
//!
//! Rules, first match wins:
//!
//! 1. **LiveStream** - title contains a live keyword AND duration is over
//!    the live threshold.
//! 2. **Short** - title contains `#` OR duration is at or under the Shorts
//!    threshold.
//! 3. **Video** - everything else.
//!
//! Classification is a pure function of the item and the thresholds.

use crate::config::AnalysisConfig;
use crate::models::{Category, ContentItem, Record};

/// Thresholds and keywords used by [`Classifier::classify`].
#[derive(Debug, Clone)]
pub struct Classifier {
    live_keywords: Vec<String>,
    short_max_seconds: f64,
    live_min_seconds: f64,
}

impl Classifier {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            live_keywords: config.live_keywords.iter().map(|k| k.to_lowercase()).collect(),
            short_max_seconds: config.short_max_seconds,
            live_min_seconds: config.live_min_seconds,
        }
    }

    /// Assign exactly one category.
    pub fn classify(&self, item: &ContentItem) -> Category {
        let title = item.title.to_lowercase();
        let duration = item.duration_seconds;

        let live_keyword = self.live_keywords.iter().any(|k| title.contains(k.as_str()));
        if live_keyword && duration > self.live_min_seconds {
            return Category::LiveStream;
        }

        if title.contains('#') || duration <= self.short_max_seconds {
            return Category::Short;
        }

        Category::Video
    }

    /// Classify and freeze an item.
    pub fn into_record(&self, item: ContentItem) -> Record {
        let category = self.classify(&item);
        Record { item, category }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, duration: f64) -> ContentItem {
        ContentItem {
            row_index: 0,
            title: title.to_string(),
            publish_date: None,
            duration_seconds: duration,
            views: 0.0,
            subscribers_gained: 0.0,
            watch_time_hours: 0.0,
            impressions: 0.0,
            impressions_ctr: 0.0,
        }
    }

    #[test]
    fn test_live_stream_needs_keyword_and_length() {
        let c = Classifier::default();

        assert_eq!(c.classify(&item("Weekly Live! Stream", 3600.0)), Category::LiveStream);
        assert_eq!(c.classify(&item("Diablo night", 301.0)), Category::LiveStream);
        assert_eq!(c.classify(&item("Diablo night", 300.0)), Category::Video);
        assert_eq!(c.classify(&item("Cooking pasta", 3600.0)), Category::Video);
    }

    #[test]
    fn test_live_priority_over_shorts() {
        let c = Classifier::default();
        assert_eq!(c.classify(&item("D&D session #12", 5400.0)), Category::LiveStream);
    }

    #[test]
    fn test_shorts_boundary() {
        let c = Classifier::default();

        assert_eq!(c.classify(&item("Quick tip", 60.0)), Category::Short);
        assert_eq!(c.classify(&item("Quick tip", 61.0)), Category::Video);
        assert_eq!(c.classify(&item("Quick tip #shorts", 900.0)), Category::Short);
    }

    #[test]
    fn test_short_stream_keyword_is_short() {
        // keyword present but too short for a stream
        let c = Classifier::default();
        assert_eq!(c.classify(&item("Stream highlight", 45.0)), Category::Short);
    }

    #[test]
    fn test_missing_duration_is_short() {
        let c = Classifier::default();
        assert_eq!(c.classify(&item("No duration column", 0.0)), Category::Short);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let c = Classifier::default();
        assert_eq!(c.classify(&item("WATCHALONG: finale", 7200.0)), Category::LiveStream);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = AnalysisConfig {
            live_keywords: vec!["podcast".into()],
            short_max_seconds: 180.0,
            ..AnalysisConfig::for_year(2026)
        };
        let c = Classifier::new(&config);

        assert_eq!(c.classify(&item("Podcast ep 1", 1800.0)), Category::LiveStream);
        assert_eq!(c.classify(&item("Live! now", 1800.0)), Category::Video);
        assert_eq!(c.classify(&item("Clip", 170.0)), Category::Short);
    }

    #[test]
    fn test_classification_is_total() {
        let c = Classifier::default();
        let titles = ["", "#", "live!", "stream #x", "plain"];
        let durations = [0.0, 60.0, 61.0, 300.0, 301.0, 10_000.0];

        for title in titles {
            for duration in durations {
                let record = c.into_record(item(title, duration));
                assert!(Category::ALL.contains(&record.category));
            }
        }
    }
}
