//! Top/bottom rankings within a category.
//!
//! Records are sorted by a metric, highest first, with a stable sort so
//! equal values keep their row order. The top slice is the first `size`
//! entries; the bottom slice is the last `size`, worst first. Ties keep row
//! order in both slices.

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::models::{Category, Metric, Record};

/// One ranked item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub title: String,
    pub value: f64,
    pub row_index: usize,
}

/// A ranked category/metric pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub category: Category,
    pub metric: Metric,
    /// Records that entered the ranking (after any pre-filter).
    pub pool_size: usize,
    pub top: Vec<RankingEntry>,
    pub bottom: Vec<RankingEntry>,
}

/// Outcome of a ranking request.
///
/// `NoQualifyingRecords` means a pre-filter removed every record, which is
/// distinct from ranking an empty category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RankingOutcome {
    Ranked(Ranking),
    #[serde(rename_all = "camelCase")]
    NoQualifyingRecords {
        category: Category,
        metric: Metric,
        min_views: f64,
    },
}

impl RankingOutcome {
    pub fn ranking(&self) -> Option<&Ranking> {
        match self {
            Self::Ranked(r) => Some(r),
            Self::NoQualifyingRecords { .. } => None,
        }
    }

    pub fn metric(&self) -> Metric {
        match self {
            Self::Ranked(r) => r.metric,
            Self::NoQualifyingRecords { metric, .. } => *metric,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Ranked(r) => r.category,
            Self::NoQualifyingRecords { category, .. } => *category,
        }
    }
}

/// What to rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingRequest {
    pub category: Category,
    pub metric: Metric,
    /// Keep only records with at least this many views.
    pub min_views: Option<f64>,
}

impl RankingRequest {
    /// Request with the CTR views threshold applied when ranking by CTR.
    pub fn new(category: Category, metric: Metric, config: &AnalysisConfig) -> Self {
        let min_views = (metric == Metric::ImpressionsCtr).then_some(config.ctr_min_views);
        Self {
            category,
            metric,
            min_views,
        }
    }
}

/// Rankings produced for every upload.
pub fn default_plan(config: &AnalysisConfig) -> Vec<RankingRequest> {
    let plan: [(Category, &[Metric]); 3] = [
        (
            Category::Video,
            &[Metric::Views, Metric::Subscribers, Metric::WatchTimeHours, Metric::ImpressionsCtr],
        ),
        (Category::Short, &[Metric::Views, Metric::Subscribers]),
        (
            Category::LiveStream,
            &[Metric::Views, Metric::Subscribers, Metric::WatchTimeHours],
        ),
    ];

    plan.iter()
        .flat_map(|(category, metrics)| {
            metrics
                .iter()
                .map(move |metric| RankingRequest::new(*category, *metric, config))
        })
        .collect()
}

/// Stable sort, highest metric first.
pub fn sort_descending(mut records: Vec<&Record>, metric: Metric) -> Vec<&Record> {
    records.sort_by(|a, b| b.item.metric(metric).total_cmp(&a.item.metric(metric)));
    records
}

/// The `n` lowest records, lowest first; ties keep row order.
pub fn lowest<'a>(records: &[&'a Record], metric: Metric, n: usize) -> Vec<&'a Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.item.metric(metric).total_cmp(&b.item.metric(metric)));
    sorted.truncate(n);
    sorted
}

/// Rank the records of one category.
pub fn rank_records(records: &[Record], request: &RankingRequest, size: usize) -> RankingOutcome {
    let pool: Vec<&Record> = records
        .iter()
        .filter(|r| r.category == request.category)
        .filter(|r| request.min_views.map_or(true, |min| r.item.views >= min))
        .collect();

    if let Some(min_views) = request.min_views {
        if pool.is_empty() {
            return RankingOutcome::NoQualifyingRecords {
                category: request.category,
                metric: request.metric,
                min_views,
            };
        }
    }

    let sorted = sort_descending(pool, request.metric);
    let entry = |r: &&Record| RankingEntry {
        title: r.item.title.clone(),
        value: r.item.metric(request.metric),
        row_index: r.item.row_index,
    };

    let top = sorted.iter().take(size).map(entry).collect();
    let tail = &sorted[sorted.len().saturating_sub(size)..];
    let bottom = lowest(tail, request.metric, size).iter().map(entry).collect();

    RankingOutcome::Ranked(Ranking {
        category: request.category,
        metric: request.metric,
        pool_size: sorted.len(),
        top,
        bottom,
    })
}

/// Run every request of a plan.
pub fn rank_all(records: &[Record], plan: &[RankingRequest], size: usize) -> Vec<RankingOutcome> {
    plan.iter()
        .map(|request| rank_records(records, request, size))
        .collect()
}
