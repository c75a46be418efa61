//! Canonical remedy record types

use serde::{Deserialize, Serialize};

use crate::domain::scoring::ConfidenceScore;

/// Excerpt from a proving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proving {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub text: String,
}

impl Proving {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// A remedy as returned by the Materia-Medica and Repertory lookups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemedyRecord {
    /// Display name
    #[serde(rename = "remedy", alias = "name", default)]
    pub name: String,
    /// Taxonomic grouping
    #[serde(alias = "kingdom", default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keynotes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub provings: Vec<Proving>,
    /// Derived by the scorer, never part of the remote response
    #[serde(rename = "_confidence", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceScore>,
}

impl RemedyRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_keynotes<I, S>(mut self, keynotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keynotes = keynotes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_proving(mut self, proving: Proving) -> Self {
        self.provings.push(proving);
        self
    }

    /// Keynotes as listed, or the summary's sentences when none are listed
    pub fn effective_keynotes(&self) -> Vec<String> {
        if !self.keynotes.is_empty() {
            return self.keynotes.clone();
        }

        match &self.summary {
            Some(summary) => summary
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Result of a single remote lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupPayload {
    Records(Vec<RemedyRecord>),
    Record(RemedyRecord),
    Text(String),
}

impl LookupPayload {
    pub fn records(&self) -> &[RemedyRecord] {
        match self {
            LookupPayload::Records(records) => records,
            LookupPayload::Record(record) => std::slice::from_ref(record),
            LookupPayload::Text(_) => &[],
        }
    }

    pub fn records_mut(&mut self) -> &mut [RemedyRecord] {
        match self {
            LookupPayload::Records(records) => records,
            LookupPayload::Record(record) => std::slice::from_mut(record),
            LookupPayload::Text(_) => &mut [],
        }
    }

    /// The first record, for screens that show a single remedy
    pub fn primary(&self) -> Option<&RemedyRecord> {
        self.records().first()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, LookupPayload::Text(_))
    }
}
