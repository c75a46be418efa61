//! Domain layer - Core lookup logic and entities

pub mod cache;
pub mod compare;
pub mod error;
pub mod highlight;
pub mod lookup;
pub mod remedy;
pub mod scoring;

pub use cache::{BackingStore, CacheEntry, Clock, ScanPage, SystemClock};
pub use compare::{compute_compare_diff, CompareDiff, CompareItem};
pub use error::DomainError;
pub use highlight::{escape_html, highlight};
pub use lookup::{FetchError, LookupKind, NetworkError, RemedySource};
pub use remedy::{normalize_payload, LookupPayload, Proving, RemedyRecord};
pub use scoring::{ConfidenceScore, RemedyScorer, ScoreComponents, ScoringWeights};
