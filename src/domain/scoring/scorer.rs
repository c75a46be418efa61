//! Remedy scoring trait

use std::fmt::Debug;

use super::confidence::ConfidenceScore;
use crate::domain::remedy::{LookupPayload, RemedyRecord};

/// Trait for scoring how well a remedy record answers a query
pub trait RemedyScorer: Send + Sync + Debug {
    /// Scores a single record against the raw query text
    fn score(&self, record: &RemedyRecord, query: &str) -> ConfidenceScore;

    /// Attaches a score to every record of the payload; text payloads are left as-is
    fn score_payload(&self, payload: &mut LookupPayload, query: &str) {
        for record in payload.records_mut() {
            let score = self.score(record, query);
            record.confidence = Some(score);
        }
    }

    /// Get the scorer name
    fn scorer_name(&self) -> &'static str;
}
