//! Plain-text strategy brief.
//!
//! Condenses the summary and the video rankings into an executive digest a
//! user can paste into an assistant of their choice. Nothing is sent
//! anywhere from here.

use serde::Serialize;

use super::aggregator::Summary;
use super::ranking::{lowest, sort_descending};
use crate::config::AnalysisConfig;
use crate::models::{Category, Metric, Record};

const TASK: &str = "TASK: Provide a professional YouTube Consultant Roadmap.
- STOP: What content types/topics have low ROI?
- CONTINUE: What is driving subscribers most efficiently?
- IMPROVE: Identify leaks in the funnel (e.g., low CTR despite high potential).
- WHY: Back up reasoning with the data provided. Skip themed lingo.";

/// Inputs of the brief, kept structured for API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyBrief {
    pub core_stats: Vec<String>,
    pub top_performers: Vec<String>,
    pub underperformers: Vec<String>,
    /// Lowest-CTR videos above the views threshold; `["N/A"]` when none.
    pub package_alert: Vec<String>,
    pub ctr_min_views: f64,
}

impl StrategyBrief {
    pub fn build(summary: &Summary, records: &[Record], config: &AnalysisConfig) -> Self {
        let n = config.brief_size;
        let videos: Vec<&Record> = records
            .iter()
            .filter(|r| r.category == Category::Video)
            .collect();

        let core_stats = Category::ALL
            .iter()
            .map(|c| {
                let m = summary.metrics(*c);
                format!(
                    "{}: {} posts, {} views, {} subs.",
                    c.label(),
                    m.published_count,
                    format_count(m.views),
                    format_count(m.subscribers_gained)
                )
            })
            .collect();

        let top_performers = titles(sort_descending(videos.clone(), Metric::Views).into_iter().take(n));
        let underperformers = titles(lowest(&videos, Metric::Views, n).into_iter());

        let qualified: Vec<&Record> = videos
            .iter()
            .copied()
            .filter(|r| r.item.views >= config.ctr_min_views)
            .collect();
        let package_alert = if qualified.is_empty() {
            vec!["N/A".to_string()]
        } else {
            titles(lowest(&qualified, Metric::ImpressionsCtr, n).into_iter())
        };

        Self {
            core_stats,
            top_performers,
            underperformers,
            package_alert,
            ctr_min_views: config.ctr_min_views,
        }
    }

    /// Render the digest as text.
    pub fn render(&self) -> String {
        let mut out = String::from("YouTube Analytics Breakdown (Executive Summary):\n\n1. CORE STATS:\n");
        for line in &self.core_stats {
            out.push_str(&format!("- {}\n", line));
        }
        out.push_str(&format!("\n2. TOP PERFORMERS: {}\n", self.top_performers.join(", ")));
        out.push_str(&format!("3. UNDERPERFORMERS: {}\n", self.underperformers.join(", ")));
        out.push_str(&format!(
            "4. PACKAGE ALERT (Low CTR with {}+ views): {}\n\n",
            format_count(self.ctr_min_views),
            self.package_alert.join(", ")
        ));
        out.push_str(TASK);
        out.push('\n');
        out
    }
}

fn titles<'a>(records: impl Iterator<Item = &'a Record>) -> Vec<String> {
    records.map(|r| r.item.title.clone()).collect()
}

/// Integer with thousands separators.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::summarize;
    use crate::models::ContentItem;

    fn video(row: usize, title: &str, views: f64, ctr: f64) -> Record {
        Record {
            item: ContentItem {
                row_index: row,
                title: title.to_string(),
                publish_date: None,
                duration_seconds: 600.0,
                views,
                subscribers_gained: 1.0,
                watch_time_hours: 0.0,
                impressions: 10.0,
                impressions_ctr: ctr,
            },
            category: Category::Video,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1234.4), "1,234");
        assert_eq!(format_count(1_000_000.0), "1,000,000");
        assert_eq!(format_count(-4500.0), "-4,500");
    }

    #[test]
    fn test_brief_sections() {
        let records = vec![
            video(0, "A", 5000.0, 2.0),
            video(1, "B", 100.0, 9.0),
            video(2, "C", 800.0, 1.0),
            video(3, "D", 20000.0, 6.0),
        ];
        let config = AnalysisConfig::for_year(2026);
        let summary = summarize(&records, None, 2026);
        let brief = StrategyBrief::build(&summary, &records, &config);

        assert_eq!(brief.top_performers, vec!["D", "A", "C"]);
        assert_eq!(brief.underperformers, vec!["B", "C", "A"]);
        assert_eq!(brief.package_alert, vec!["C", "A", "D"]);

        let text = brief.render();
        assert!(text.contains("2. TOP PERFORMERS: D, A, C"));
        assert!(text.contains("Low CTR with 500+ views"));
        assert!(text.contains("Videos: 0 posts"));
    }

    #[test]
    fn test_brief_without_qualifying_ctr() {
        let records = vec![video(0, "tiny", 10.0, 2.0)];
        let config = AnalysisConfig::for_year(2026);
        let summary = summarize(&records, None, 2026);
        let brief = StrategyBrief::build(&summary, &records, &config);

        assert_eq!(brief.package_alert, vec!["N/A"]);
    }
}
