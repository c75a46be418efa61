//! Confidence score types and weighting

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Sub-signals feeding the composite score, each 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub match_score: u8,
    pub source_count: u8,
    pub proving_count: u8,
    pub concordance: u8,
}

/// Composite confidence attached to a remedy record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    /// 0 up to the configured cap (99 by default, never full certainty)
    pub score: u8,
    pub components: ScoreComponents,
}

/// Weights for combining the sub-signals
///
/// The defaults were tuned by inspection; they are product settings rather
/// than derived constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub match_weight: f64,
    pub source_weight: f64,
    pub proving_weight: f64,
    pub concordance_weight: f64,
    /// Upper bound of the composite score
    pub cap: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            match_weight: 0.40,
            source_weight: 0.25,
            proving_weight: 0.20,
            concordance_weight: 0.15,
            cap: 99,
        }
    }
}

impl ScoringWeights {
    /// Rejects negative or non-finite weights and caps above 100
    pub fn validate(&self) -> Result<(), DomainError> {
        let weights = [
            ("match_weight", self.match_weight),
            ("source_weight", self.source_weight),
            ("proving_weight", self.proving_weight),
            ("concordance_weight", self.concordance_weight),
        ];

        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DomainError::validation(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        if self.cap > 100 {
            return Err(DomainError::validation(format!(
                "cap must be at most 100, got {}",
                self.cap
            )));
        }

        Ok(())
    }

    /// Weighted sum of the components, rounded and clamped to `[0, cap]`
    pub fn combine(&self, components: &ScoreComponents) -> u8 {
        let raw = self.match_weight * f64::from(components.match_score)
            + self.source_weight * f64::from(components.source_count)
            + self.proving_weight * f64::from(components.proving_count)
            + self.concordance_weight * f64::from(components.concordance);

        raw.round().clamp(0.0, f64::from(self.cap)) as u8
    }
}

impl ConfidenceScore {
    pub fn from_components(components: ScoreComponents, weights: &ScoringWeights) -> Self {
        Self {
            score: weights.combine(&components),
            components,
        }
    }
}
