//! Heuristic remedy scorer
//!
//! Combines four signals: query term matches in keynotes and provings, how
//! many sources describe the remedy, how many provings exist, and how often
//! keynotes are corroborated by more than one source.

use std::collections::BTreeSet;

use crate::domain::remedy::RemedyRecord;
use crate::domain::scoring::{ConfidenceScore, RemedyScorer, ScoreComponents, ScoringWeights};

const SOURCE_SATURATION: usize = 10;
const PROVING_SATURATION: usize = 30;
const MATCH_MULTIPLIER: f64 = 12.0;
const CONCORDANCE_FALLBACK_PER_SOURCE: usize = 7;
const CONCORDANCE_FALLBACK_MAX: usize = 50;

/// Scorer implementing the weighted four-signal heuristic
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: ScoringWeights,
}

impl HeuristicScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    fn percent(numerator: usize, denominator: usize) -> u8 {
        let ratio = numerator as f64 / denominator.max(1) as f64;
        (ratio * 100.0).round().clamp(0.0, 100.0) as u8
    }

    fn source_count(record: &RemedyRecord) -> u8 {
        Self::percent(record.sources.len().min(SOURCE_SATURATION), SOURCE_SATURATION)
    }

    fn proving_count(record: &RemedyRecord) -> u8 {
        Self::percent(record.provings.len().min(PROVING_SATURATION), PROVING_SATURATION)
    }

    fn concordance(record: &RemedyRecord, keynotes: &[String]) -> u8 {
        if record.sources.len() < 2 || keynotes.is_empty() {
            let fallback = (record.sources.len() * CONCORDANCE_FALLBACK_PER_SOURCE)
                .min(CONCORDANCE_FALLBACK_MAX);
            return fallback as u8;
        }

        let sources: BTreeSet<String> = record.sources.iter().map(|s| s.to_lowercase()).collect();

        let corroborated = keynotes
            .iter()
            .filter(|keynote| {
                sources
                    .iter()
                    .filter(|source| source.contains(keynote.as_str()))
                    .take(2)
                    .count()
                    >= 2
            })
            .count();

        Self::percent(corroborated, keynotes.len())
    }

    fn match_score(record: &RemedyRecord, keynotes: &[String], query: &str) -> u8 {
        let query = query.to_lowercase();
        let tokens: Vec<&str> = query.split_whitespace().collect();

        if tokens.is_empty() {
            return 0;
        }

        let provings: Vec<String> = record.provings.iter().map(|p| p.text.to_lowercase()).collect();
        let texts = keynotes.iter().chain(provings.iter());

        let matches: usize = texts
            .map(|text| tokens.iter().map(|t| text.matches(t).count()).sum::<usize>())
            .sum();

        let raw = matches as f64 / tokens.len().max(1) as f64 * MATCH_MULTIPLIER;
        raw.min(100.0).round() as u8
    }

    /// Computes the four sub-signals
    pub fn components(&self, record: &RemedyRecord, query: &str) -> ScoreComponents {
        let keynotes: Vec<String> = record
            .effective_keynotes()
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        ScoreComponents {
            match_score: Self::match_score(record, &keynotes, query),
            source_count: Self::source_count(record),
            proving_count: Self::proving_count(record),
            concordance: Self::concordance(record, &keynotes),
        }
    }
}

impl RemedyScorer for HeuristicScorer {
    fn score(&self, record: &RemedyRecord, query: &str) -> ConfidenceScore {
        ConfidenceScore::from_components(self.components(record, query), &self.weights)
    }

    fn scorer_name(&self) -> &'static str {
        "heuristic"
    }
}
