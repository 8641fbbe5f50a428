use channelstats::analysis::aggregator::reconcile;
use channelstats::{
    analyze_bytes, rank_records, to_number, AnalysisConfig, Category, Classifier, ContentItem,
    Metric, PipelineError, RankingOutcome, RankingRequest, SchemaError, TotalRecord,
};

fn config() -> AnalysisConfig {
    AnalysisConfig::for_year(2026)
}

fn utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

const PREAMBLE_EXPORT: &str = "\
Channel analytics
Jan 1, 2026 - Dec 31, 2026

Content\tVideo title\tVideo publish time\tDuration\tViews\tWatch time (hours)\tSubscribers\tImpressions\tImpressions click-through rate (%)
Total\t\t\t\t\"12,345\"\t900.5\t1000\t50000\t4.1
v1\tHow I built a desk\tMar 3, 2026\t840\t\"5,000\"\t300.2\t250\t10000\t6.0%
v2\tDesk tour #shorts\tMar 5, 2026\t35\t\"4,000\"\t20.0\t300\t20000\t3.0%
v3\tFriday watchalong\tMar 7, 2026\t7200\t800\t500.0\t80\t5000\t2.0%
v4\tOld upload\tNov 2, 2025\t600\t545\t80.3\t70\t15000\t1.0%
";

#[test]
fn analyzes_utf16_tab_export_with_preamble() {
    let report = analyze_bytes(&utf16le(PREAMBLE_EXPORT), &config()).unwrap();

    assert_eq!(report.source.encoding, "UTF-16LE");
    assert_eq!(report.source.delimiter, "TAB");
    assert_eq!(report.source.header_row, 3);
    assert_eq!(report.records.len(), 4);

    let s = &report.summary;
    assert_eq!(s.videos.published_count, 1);
    assert_eq!(s.shorts.published_count, 1);
    assert_eq!(s.live_streams.published_count, 1);
    assert_eq!(s.total_published, 3);
    assert_eq!(s.videos.views, 5000.0);
    assert_eq!(s.total_subscribers, 1000.0);
    assert_eq!(s.other_subscribers, 1000.0 - 250.0 - 300.0 - 80.0);
}

#[test]
fn rankings_use_full_table_while_summary_is_year_scoped() {
    let report = analyze_bytes(PREAMBLE_EXPORT.as_bytes(), &config()).unwrap();

    let video_views = report
        .rankings
        .iter()
        .find(|o| o.category() == Category::Video && o.metric() == Metric::Views)
        .and_then(|o| o.ranking())
        .unwrap();
    assert_eq!(video_views.pool_size, 2);
    assert_eq!(video_views.top[0].title, "How I built a desk");
    assert_eq!(video_views.bottom[0].title, "Old upload");

    let video_ctr = report
        .rankings
        .iter()
        .find(|o| o.metric() == Metric::ImpressionsCtr)
        .and_then(|o| o.ranking())
        .unwrap();
    assert_eq!(video_ctr.top[0].value, 6.0);
    assert_eq!(video_ctr.top.len(), 2);
}

#[test]
fn end_to_end_reconciliation_scenario() {
    let csv = "\
Content,Video title,Video publish time,Duration,Views,Subscribers
Total,,,,1050,500
a,My Vlog #fun,2026-02-01,45,1000,200
b,Weekly Live! Stream,2026-02-02,3600,50,10
";
    let report = analyze_bytes(csv.as_bytes(), &config()).unwrap();

    assert_eq!(report.summary.shorts.published_count, 1);
    assert_eq!(report.summary.live_streams.published_count, 1);
    assert_eq!(report.summary.videos.published_count, 0);
    assert_eq!(report.summary.other_subscribers, 290.0);
}

#[test]
fn negative_remainder_is_not_clamped() {
    let csv = "\
Content,Video title,Video publish time,Duration,Views,Subscribers
Total,,,,0,100
a,Long video,2026-02-01,900,10,150
";
    let report = analyze_bytes(csv.as_bytes(), &config()).unwrap();
    assert_eq!(report.summary.other_subscribers, -50.0);

    let total = TotalRecord { subscribers_gained: 1000.0 };
    assert_eq!(reconcile(700.0, Some(&total)).1, 300.0);
    assert_eq!(reconcile(1200.0, Some(&total)).1, -200.0);
}

#[test]
fn weighted_ctr_is_not_the_plain_mean() {
    let csv = "\
Video title,Video publish time,Duration,Views,Subscribers,Impressions,Impressions click-through rate (%)
A,2026-01-01,600,10,0,100,2.0
B,2026-01-02,600,10,0,300,6.0
";
    let report = analyze_bytes(csv.as_bytes(), &config()).unwrap();
    assert!((report.summary.videos.weighted_ctr - 5.0).abs() < 1e-9);
}

#[test]
fn missing_mandatory_columns_abort() {
    let csv = "Content,Duration,Impressions\nabc,30,100";
    let err = analyze_bytes(csv.as_bytes(), &config()).unwrap_err();

    match err {
        PipelineError::Schema(SchemaError::MissingColumns(fields)) => assert_eq!(fields.len(), 3),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn undecodable_buffer_aborts() {
    let err = analyze_bytes(&[0x00, 0xD8], &config()).unwrap_err();
    assert!(matches!(err, PipelineError::Parse(channelstats::ParseError::Decode(_))));
}

#[test]
fn numeric_coercion_contract() {
    assert_eq!(to_number("1,234%"), 1234.0);
    assert_eq!(to_number("abc"), 0.0);
    assert_eq!(to_number(""), 0.0);
}

fn item(row: usize, title: &str, duration: f64, views: f64) -> ContentItem {
    ContentItem {
        row_index: row,
        title: title.to_string(),
        publish_date: None,
        duration_seconds: duration,
        views,
        subscribers_gained: 0.0,
        watch_time_hours: 0.0,
        impressions: 0.0,
        impressions_ctr: 0.0,
    }
}

#[test]
fn classification_boundaries() {
    let c = Classifier::new(&config());

    assert_eq!(c.classify(&item(0, "Clip", 60.0, 0.0)), Category::Short);
    assert_eq!(c.classify(&item(0, "Clip", 61.0, 0.0)), Category::Video);
    assert_eq!(c.classify(&item(0, "Live! show", 300.0, 0.0)), Category::Video);
    assert_eq!(c.classify(&item(0, "Live! show", 301.0, 0.0)), Category::LiveStream);
    assert_eq!(c.classify(&item(0, "Live! show #fun", 301.0, 0.0)), Category::LiveStream);
}

#[test]
fn ranking_ties_and_ctr_threshold() {
    let c = Classifier::new(&config());
    let records: Vec<_> = [
        item(0, "first", 600.0, 500.0),
        item(1, "second", 600.0, 500.0),
        item(2, "under", 600.0, 499.0),
    ]
    .into_iter()
    .map(|i| c.into_record(i))
    .collect();

    let views = rank_records(&records, &RankingRequest::new(Category::Video, Metric::Views, &config()), 5);
    let ranking = views.ranking().unwrap();
    let top: Vec<&str> = ranking.top.iter().map(|e| e.title.as_str()).collect();
    let bottom: Vec<&str> = ranking.bottom.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(top, vec!["first", "second", "under"]);
    assert_eq!(bottom, vec!["under", "first", "second"]);

    let ctr = rank_records(
        &records,
        &RankingRequest::new(Category::Video, Metric::ImpressionsCtr, &config()),
        5,
    );
    assert_eq!(ctr.ranking().unwrap().pool_size, 2);

    let strict = AnalysisConfig {
        ctr_min_views: 10_000.0,
        ..config()
    };
    let none = rank_records(
        &records,
        &RankingRequest::new(Category::Video, Metric::ImpressionsCtr, &strict),
        5,
    );
    assert!(matches!(none, RankingOutcome::NoQualifyingRecords { .. }));
}

#[test]
fn same_input_same_output() {
    let first = analyze_bytes(PREAMBLE_EXPORT.as_bytes(), &config()).unwrap();
    let second = analyze_bytes(PREAMBLE_EXPORT.as_bytes(), &config()).unwrap();

    assert_eq!(first.summary, second.summary);
    assert_eq!(first.rankings, second.rankings);
}
