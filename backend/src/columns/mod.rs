//! Column resolution: vendor column names to a fixed semantic schema.
//!
//! Export column names drift between vendors and UI languages
//! ("Video title" vs "Title", "Watch time (hours)" vs "Watch time").
//! Each [`SemanticField`] carries an ordered list of candidate names; the
//! first candidate that is a case-insensitive substring of a raw column
//! wins, scanning raw columns in file order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SchemaError;

/// Logical fields the analysis understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticField {
    Title,
    PublishDate,
    Duration,
    Views,
    Subscribers,
    WatchTimeHours,
    Impressions,
    ImpressionsCtr,
}

impl SemanticField {
    /// Every field, in resolution order.
    pub const ALL: [SemanticField; 8] = [
        Self::Title,
        Self::PublishDate,
        Self::Duration,
        Self::Views,
        Self::Subscribers,
        Self::WatchTimeHours,
        Self::Impressions,
        Self::ImpressionsCtr,
    ];

    /// Fields without which no analysis is attempted.
    pub const MANDATORY: [SemanticField; 3] = [Self::Title, Self::Views, Self::Subscribers];

    /// Ordered candidate column names. Order matters: first match wins.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Title => &["Video title", "Title"],
            Self::PublishDate => &["Video publish time", "Published", "Date"],
            Self::Duration => &["Duration"],
            Self::Views => &["Views"],
            Self::Subscribers => &["Subscribers"],
            Self::WatchTimeHours => &["Watch time (hours)", "Watch time"],
            Self::Impressions => &["Impressions"],
            Self::ImpressionsCtr => &["Impressions click-through rate (%)", "CTR"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::PublishDate => "PublishDate",
            Self::Duration => "Duration",
            Self::Views => "Views",
            Self::Subscribers => "Subscribers",
            Self::WatchTimeHours => "WatchTimeHours",
            Self::Impressions => "Impressions",
            Self::ImpressionsCtr => "ImpressionsCTR",
        }
    }

    pub fn is_mandatory(&self) -> bool {
        Self::MANDATORY.contains(self)
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw column bound to a logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColumn {
    /// Position in the raw header.
    pub index: usize,
    /// Cleaned raw column name.
    pub name: String,
}

/// Resolution of every [`SemanticField`]; `None` when unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticColumns {
    pub title: Option<ResolvedColumn>,
    pub publish_date: Option<ResolvedColumn>,
    pub duration: Option<ResolvedColumn>,
    pub views: Option<ResolvedColumn>,
    pub subscribers: Option<ResolvedColumn>,
    pub watch_time_hours: Option<ResolvedColumn>,
    pub impressions: Option<ResolvedColumn>,
    #[serde(rename = "impressionsCTR")]
    pub impressions_ctr: Option<ResolvedColumn>,
}

impl SemanticColumns {
    pub fn get(&self, field: SemanticField) -> Option<&ResolvedColumn> {
        match field {
            SemanticField::Title => self.title.as_ref(),
            SemanticField::PublishDate => self.publish_date.as_ref(),
            SemanticField::Duration => self.duration.as_ref(),
            SemanticField::Views => self.views.as_ref(),
            SemanticField::Subscribers => self.subscribers.as_ref(),
            SemanticField::WatchTimeHours => self.watch_time_hours.as_ref(),
            SemanticField::Impressions => self.impressions.as_ref(),
            SemanticField::ImpressionsCtr => self.impressions_ctr.as_ref(),
        }
    }

    fn slot(&mut self, field: SemanticField) -> &mut Option<ResolvedColumn> {
        match field {
            SemanticField::Title => &mut self.title,
            SemanticField::PublishDate => &mut self.publish_date,
            SemanticField::Duration => &mut self.duration,
            SemanticField::Views => &mut self.views,
            SemanticField::Subscribers => &mut self.subscribers,
            SemanticField::WatchTimeHours => &mut self.watch_time_hours,
            SemanticField::Impressions => &mut self.impressions,
            SemanticField::ImpressionsCtr => &mut self.impressions_ctr,
        }
    }

    /// Column index of a field, if resolved.
    pub fn index(&self, field: SemanticField) -> Option<usize> {
        self.get(field).map(|c| c.index)
    }

    /// Fields that did not resolve.
    pub fn unresolved(&self) -> Vec<SemanticField> {
        SemanticField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// Fail with [`SchemaError`] when a mandatory field is unresolved.
    pub fn require_mandatory(&self) -> Result<(), SchemaError> {
        let missing: Vec<SemanticField> = SemanticField::MANDATORY
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns(missing))
        }
    }
}

/// First raw column matching any candidate, candidates tried in order.
pub fn find_column<S: AsRef<str>>(headers: &[S], candidates: &[&str]) -> Option<ResolvedColumn> {
    for candidate in candidates {
        let needle = candidate.to_lowercase();
        for (index, header) in headers.iter().enumerate() {
            if header.as_ref().to_lowercase().contains(&needle) {
                return Some(ResolvedColumn {
                    index,
                    name: header.as_ref().to_string(),
                });
            }
        }
    }
    None
}

/// Resolve every logical field against the raw header.
///
/// Never fails; see [`SemanticColumns::require_mandatory`].
pub fn resolve_columns<S: AsRef<str>>(headers: &[S]) -> SemanticColumns {
    let mut columns = SemanticColumns::default();
    for field in SemanticField::ALL {
        *columns.slot(field) = find_column(headers, field.candidates());
    }
    columns
}
