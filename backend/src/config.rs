//! Analysis configuration.
//!
//! Settings come from, later wins: built-in defaults, an optional JSON file,
//! environment variables (a `.env` file is loaded by the binary through
//! `dotenvy`), then CLI flags applied by the caller.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::parser::DEFAULT_HEADER_MARKERS;

pub const ENV_YEAR: &str = "CHANNELSTATS_YEAR";
pub const ENV_SHORT_MAX_SECONDS: &str = "CHANNELSTATS_SHORT_MAX_SECONDS";
pub const ENV_LIVE_MIN_SECONDS: &str = "CHANNELSTATS_LIVE_MIN_SECONDS";
pub const ENV_CTR_MIN_VIEWS: &str = "CHANNELSTATS_CTR_MIN_VIEWS";
pub const ENV_RANKING_SIZE: &str = "CHANNELSTATS_RANKING_SIZE";
pub const ENV_LIVE_KEYWORDS: &str = "CHANNELSTATS_LIVE_KEYWORDS";

/// Title keywords that mark a live stream (matched lower-case).
pub const DEFAULT_LIVE_KEYWORDS: [&str; 7] = [
    "live!",
    "watchalong",
    "stream",
    "let's play",
    "d&d",
    "diablo",
    "ready player nerd",
];

/// Tunables for classification, aggregation and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Calendar year the summary is restricted to.
    pub reporting_year: i32,

    /// Live-stream title keywords.
    pub live_keywords: Vec<String>,

    /// Items at or below this duration are Shorts.
    pub short_max_seconds: f64,

    /// Keyword matches must be strictly longer than this to be live streams.
    pub live_min_seconds: f64,

    /// Minimum views (inclusive) for an item to enter a CTR ranking.
    pub ctr_min_views: f64,

    /// Entries in each top/bottom slice.
    pub ranking_size: usize,

    /// Titles listed per section of the strategy brief.
    pub brief_size: usize,

    /// Substrings identifying the header line.
    pub header_markers: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reporting_year: chrono::Local::now().year(),
            live_keywords: DEFAULT_LIVE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            short_max_seconds: 60.0,
            live_min_seconds: 300.0,
            ctr_min_views: 500.0,
            ranking_size: 5,
            brief_size: 3,
            header_markers: DEFAULT_HEADER_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl AnalysisConfig {
    /// Defaults with an explicit reporting year.
    pub fn for_year(year: i32) -> Self {
        Self {
            reporting_year: year,
            ..Self::default()
        }
    }

    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = serde_json::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Defaults or file, then environment overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in practice).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_YEAR) {
            self.reporting_year = parse_value(ENV_YEAR, &v)?;
        }
        if let Some(v) = lookup(ENV_SHORT_MAX_SECONDS) {
            self.short_max_seconds = parse_value(ENV_SHORT_MAX_SECONDS, &v)?;
        }
        if let Some(v) = lookup(ENV_LIVE_MIN_SECONDS) {
            self.live_min_seconds = parse_value(ENV_LIVE_MIN_SECONDS, &v)?;
        }
        if let Some(v) = lookup(ENV_CTR_MIN_VIEWS) {
            self.ctr_min_views = parse_value(ENV_CTR_MIN_VIEWS, &v)?;
        }
        if let Some(v) = lookup(ENV_RANKING_SIZE) {
            self.ranking_size = parse_value(ENV_RANKING_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_LIVE_KEYWORDS) {
            self.live_keywords = v
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
        self.normalize();
        self.validate()
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.ranking_size == 0 {
            return Err(invalid("rankingSize", "must be at least 1"));
        }
        if self.brief_size == 0 {
            return Err(invalid("briefSize", "must be at least 1"));
        }
        if self.live_keywords.is_empty() {
            return Err(invalid("liveKeywords", "must contain at least one keyword"));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        for keyword in &mut self.live_keywords {
            *keyword = keyword.to_lowercase();
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| invalid(key, &e.to_string()))
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
