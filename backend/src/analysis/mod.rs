//! Analysis module.
//!
//! Turns a parsed export into classified records and reports:
//! - Coerce: shared numeric coercion
//! - Dates: publish-date parsing
//! - Classifier: Video / Short / LiveStream rules
//! - Aggregator: per-category rollups and reconciliation
//! - Ranking: top/bottom slices per metric
//! - Brief: plain-text executive digest
//! - Pipeline: bytes to [`AnalysisReport`]

pub mod aggregator;
pub mod brief;
pub mod classifier;
pub mod coerce;
pub mod dates;
pub mod pipeline;
pub mod ranking;

pub use aggregator::{summarize, Summary};
pub use brief::StrategyBrief;
pub use classifier::Classifier;
pub use coerce::to_number;
pub use pipeline::{analyze_bytes, analyze_file, analyze_parsed, AnalysisReport, SourceInfo};
pub use ranking::{rank_records, Ranking, RankingEntry, RankingOutcome, RankingRequest};
