//! Error types for the Channelstats analysis pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`ParseError`] - Decoding and CSV reading errors
//! - [`SchemaError`] - Mandatory columns missing from the export
//! - [`ConfigError`] - Configuration loading errors
//! - [`PipelineError`] - Top-level analysis errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! An empty ranking is not an error: see
//! [`RankingOutcome::NoQualifyingRecords`](crate::analysis::ranking::RankingOutcome).

use thiserror::Error;

use crate::columns::SemanticField;

// =============================================================================
// Parsing Errors
// =============================================================================

/// Errors while turning raw bytes into a table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Buffer is neither UTF-8 nor UTF-16.
    #[error("Cannot decode report: {0}")]
    Decode(String),

    /// Nothing left after decoding.
    #[error("Report is empty")]
    EmptyReport,

    /// Malformed delimited data.
    #[error("Invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Mandatory logical columns could not be resolved.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// One or more of Title, Views, Subscribers is missing.
    #[error(
        "Missing required columns: {}. Please ensure you are uploading the 'Content' breakdown CSV.",
        format_fields(.0)
    )]
    MissingColumns(Vec<SemanticField>),
}

fn format_fields(fields: &[SemanticField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading [`AnalysisConfig`](crate::config::AnalysisConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting has an unusable value.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Fatal analysis errors.
///
/// This is the error returned by [`crate::analysis::pipeline::analyze_bytes`].
/// Either the whole report is produced or exactly one of these is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Decoding or CSV error.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Mandatory columns missing.
    #[error("{0}")]
    Schema(#[from] SchemaError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing operations.
pub type ParseOutcome<T> = Result<T, ParseError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
