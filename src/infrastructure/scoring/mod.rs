//! Scoring infrastructure

mod heuristic;

pub use heuristic::HeuristicScorer;
