//! Homeopathika remedy lookup core
//!
//! Cached materia medica and repertory lookups with:
//! - A TTL cache with oldest-first trimming over pluggable backing stores
//! - Confidence scores for lookup results
//! - HTML-safe query highlighting
//! - Keynote comparison of two or three remedies
//! - Stale-while-revalidate request orchestration with cancellation

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
