//! Scoring domain - confidence heuristics for lookup results

mod confidence;
mod scorer;

pub use confidence::{ConfidenceScore, ScoreComponents, ScoringWeights};
pub use scorer::RemedyScorer;

#[cfg(test)]
pub use scorer::mock::FixedScorer;
