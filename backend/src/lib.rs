//! # Channelstats - categorized performance summaries for channel exports
//!
//! Channelstats reads a content-performance export (CSV/TSV, UTF-8 or
//! UTF-16, with optional preamble lines) and produces per-category totals,
//! an impressions-weighted CTR, a reconciliation against the export's total
//! row, and top/bottom rankings per metric.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Export     │────▶│   Parser    │────▶│  Columns +  │────▶│ Summary +   │
//! │ (UTF-8/16)  │     │ (auto-det.) │     │ Classifier  │     │ Rankings    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use channelstats::{analyze_file, AnalysisConfig};
//!
//! let report = analyze_file("Table data.csv", &AnalysisConfig::for_year(2026))?;
//! println!("Shorts published: {}", report.summary.shorts.published_count);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Thresholds, keywords and reporting year
//! - [`models`] - Domain models (Record, Category, CategoryMetrics)
//! - [`parser`] - Export parsing with auto-detection
//! - [`columns`] - Vendor column names to logical fields
//! - [`analysis`] - Classification, aggregation, ranking, pipeline
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod columns;
pub mod parser;

// Analysis
pub mod analysis;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ParseError, PipelineError, SchemaError, ServerError};

pub use config::AnalysisConfig;

pub use models::{Category, CategoryMetrics, ContentItem, Metric, Record, TotalRecord};

pub use parser::{
    decode_content, detect_delimiter, locate_header, parse_report, parse_report_file,
    parse_report_with, ParsedReport, RawRow, RawTable, DEFAULT_HEADER_MARKERS,
};

pub use columns::{resolve_columns, SemanticColumns, SemanticField};

pub use analysis::{
    analyze_bytes, analyze_file, analyze_parsed, rank_records, summarize, to_number,
    AnalysisReport, Classifier, Ranking, RankingEntry, RankingOutcome, RankingRequest,
    StrategyBrief, Summary,
};

pub use api::types::{error_response, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
