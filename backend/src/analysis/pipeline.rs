//! End-to-end analysis: raw export bytes to summary and rankings.
//!
//! ```text
//! bytes ─▶ parser ─▶ columns ─▶ classifier ─┬─▶ aggregator (year view)
//!                                           └─▶ ranking    (full table)
//! ```
//!
//! Each call is independent: no state is kept between uploads.
//!
//! # Example
//!
//! ```rust,ignore
//! use channelstats::{analyze_file, AnalysisConfig};
//!
//! let report = analyze_file("Table data.csv", &AnalysisConfig::for_year(2026))?;
//! println!("Other subscribers: {}", report.summary.other_subscribers);
//! ```

use serde::Serialize;
use std::path::Path;

use super::aggregator::{summarize, Summary};
use super::brief::StrategyBrief;
use super::classifier::Classifier;
use super::coerce::{to_number, to_number_opt};
use super::dates::parse_publish_date;
use super::ranking::{default_plan, rank_all, RankingOutcome};
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::columns::{resolve_columns, SemanticColumns, SemanticField};
use crate::config::AnalysisConfig;
use crate::error::{ParseError, PipelineResult};
use crate::models::{Category, ContentItem, Record, TotalRecord};
use crate::parser::{parse_report, ParsedReport, RawRow};

/// Where the data came from and how it was read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub encoding: String,
    pub delimiter: String,
    pub header_row: usize,
    pub columns: Vec<String>,
    pub row_count: usize,
}

/// Everything produced for one upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub source: SourceInfo,
    pub columns: SemanticColumns,
    pub summary: Summary,
    pub rankings: Vec<RankingOutcome>,
    pub brief: StrategyBrief,
    /// Every classified item, in row order.
    pub records: Vec<Record>,
}

impl AnalysisReport {
    /// Records of one category, in row order.
    pub fn records_in(&self, category: Category) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.category == category)
    }
}

/// Analyze an export file.
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> PipelineResult<AnalysisReport> {
    let bytes = std::fs::read(path.as_ref()).map_err(ParseError::from)?;
    analyze_bytes(&bytes, config)
}

/// Analyze a raw export buffer.
pub fn analyze_bytes(bytes: &[u8], config: &AnalysisConfig) -> PipelineResult<AnalysisReport> {
    log_info("📖 Reading analytics export...");
    let parsed = parse_report(bytes, &config.header_markers)?;
    analyze_parsed(parsed, config)
}

/// Analyze an already-parsed export.
pub fn analyze_parsed(parsed: ParsedReport, config: &AnalysisConfig) -> PipelineResult<AnalysisReport> {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Header found on line {}", parsed.header_row + 1));
    log_success(format!("Read {} content rows", parsed.table.len()));

    let columns = resolve_columns(&parsed.table.headers);
    print_column_mapping(&columns);
    columns.require_mandatory()?;

    let total = parsed.total.as_ref().map(|row| build_total(row, &columns));
    match &total {
        Some(t) => log_success(format!("Total row: {} subscribers", t.subscribers_gained)),
        None => log_warning("No total row; reconciliation uses the category sum"),
    }

    let records = classify_rows(&parsed.table.rows, &columns, config);
    for category in Category::ALL {
        let count = records.iter().filter(|r| r.category == category).count();
        log_info_indent(format!("{}: {}", category.label(), count), 1);
    }

    log_info(format!("📊 Summarizing {}...", config.reporting_year));
    let summary = summarize(&records, total.as_ref(), config.reporting_year);
    if summary.undated_records > 0 {
        log_warning(format!(
            "{} rows without a readable publish date left out of the summary",
            summary.undated_records
        ));
    }
    if summary.other_subscribers < 0.0 {
        log_warning(format!(
            "Categories account for more subscribers than the total row ({})",
            summary.other_subscribers
        ));
    }

    let rankings = rank_all(&records, &default_plan(config), config.ranking_size);
    let brief = StrategyBrief::build(&summary, &records, config);
    log_success(format!("{} rankings computed", rankings.len()));

    Ok(AnalysisReport {
        source: SourceInfo {
            encoding: parsed.encoding,
            delimiter: format_delimiter(parsed.delimiter).to_string(),
            header_row: parsed.header_row,
            columns: parsed.table.headers.clone(),
            row_count: parsed.table.len(),
        },
        columns,
        summary,
        rankings,
        brief,
        records,
    })
}

/// Build and classify one record per content row.
pub fn classify_rows(rows: &[RawRow], columns: &SemanticColumns, config: &AnalysisConfig) -> Vec<Record> {
    let classifier = Classifier::new(config);
    rows.iter()
        .enumerate()
        .map(|(i, row)| classifier.into_record(build_item(i, row, columns)))
        .collect()
}

/// Typed item from a raw row; absent columns give defaults.
pub fn build_item(row_index: usize, row: &RawRow, columns: &SemanticColumns) -> ContentItem {
    let cell = |field: SemanticField| columns.index(field).map(|i| row.get(i));
    let number = |field: SemanticField| to_number_opt(cell(field));

    ContentItem {
        row_index,
        title: cell(SemanticField::Title).unwrap_or("").to_string(),
        publish_date: cell(SemanticField::PublishDate).and_then(parse_publish_date),
        duration_seconds: number(SemanticField::Duration),
        views: number(SemanticField::Views),
        subscribers_gained: number(SemanticField::Subscribers),
        watch_time_hours: number(SemanticField::WatchTimeHours),
        impressions: number(SemanticField::Impressions),
        impressions_ctr: number(SemanticField::ImpressionsCtr),
    }
}

/// Only the subscriber count of the total row is used.
pub fn build_total(row: &RawRow, columns: &SemanticColumns) -> TotalRecord {
    TotalRecord {
        subscribers_gained: columns
            .index(SemanticField::Subscribers)
            .map(|i| to_number(row.get(i)))
            .unwrap_or(0.0),
    }
}

fn print_column_mapping(columns: &SemanticColumns) {
    log_info("🗺️  Column mapping:");
    for field in SemanticField::ALL {
        match columns.get(field) {
            Some(col) => log_info_indent(format!("{} → {}", col.name, field), 1),
            None if field.is_mandatory() => log_warning(format!("{} not found", field)),
            None => log_info_indent(format!("{} not found (defaults to 0)", field), 1),
        }
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    const EXPORT: &str = "\
Content,Video title,Video publish time,Duration,Views,Subscribers
Total,,,,1050,500
abc,My Vlog #fun,\"Mar 3, 2026\",45,1000,200
def,Weekly Live! Stream,\"Apr 1, 2026\",3600,50,10
";

    #[test]
    fn test_end_to_end_scenario() {
        let report = analyze_bytes(EXPORT.as_bytes(), &AnalysisConfig::for_year(2026)).unwrap();
        let summary = &report.summary;

        assert_eq!(summary.shorts.published_count, 1);
        assert_eq!(summary.live_streams.published_count, 1);
        assert_eq!(summary.videos.published_count, 0);
        assert_eq!(summary.total_subscribers, 500.0);
        assert_eq!(summary.other_subscribers, 290.0);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.source.row_count, 2);
    }

    #[test]
    fn test_other_year_empties_summary_but_not_rankings() {
        let report = analyze_bytes(EXPORT.as_bytes(), &AnalysisConfig::for_year(2025)).unwrap();

        assert_eq!(report.summary.total_published, 0);
        assert_eq!(report.summary.other_subscribers, 500.0);

        let shorts_views = report
            .rankings
            .iter()
            .find(|o| o.category() == Category::Short && o.metric() == crate::models::Metric::Views)
            .and_then(|o| o.ranking())
            .unwrap();
        assert_eq!(shorts_views.top[0].title, "My Vlog #fun");
    }

    #[test]
    fn test_missing_mandatory_columns() {
        let csv = "Content,Video title,Duration\nabc,Hello,30";
        let err = analyze_bytes(csv.as_bytes(), &AnalysisConfig::for_year(2026)).unwrap_err();

        assert!(matches!(err, PipelineError::Schema(_)));
        assert!(err.to_string().contains("Views, Subscribers"));
    }

    #[test]
    fn test_build_item_defaults() {
        let columns = resolve_columns(&["Title", "Views", "Subscribers"]);
        let row = RawRow {
            values: vec!["Clip".into(), "1,200".into(), "oops".into()],
        };
        let item = build_item(4, &row, &columns);

        assert_eq!(item.row_index, 4);
        assert_eq!(item.views, 1200.0);
        assert_eq!(item.subscribers_gained, 0.0);
        assert_eq!(item.duration_seconds, 0.0);
        assert_eq!(item.publish_date, None);
    }

    #[test]
    fn test_video_ctr_ranking_reports_no_qualifying() {
        let csv = "\
Video title,Video publish time,Duration,Views,Subscribers,Impressions,Impressions click-through rate (%)
Long talk,2026-01-10,900,120,3,1000,4.5
";
        let report = analyze_bytes(csv.as_bytes(), &AnalysisConfig::for_year(2026)).unwrap();
        let ctr = report
            .rankings
            .iter()
            .find(|o| o.metric() == crate::models::Metric::ImpressionsCtr)
            .unwrap();

        assert!(matches!(ctr, RankingOutcome::NoQualifyingRecords { .. }));
        assert_eq!(report.summary.videos.weighted_ctr, 4.5);
    }
}
