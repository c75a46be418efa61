//! Infrastructure layer - Backing stores, remote sources and scoring

pub mod cache;
pub mod logging;
pub mod lookup;
pub mod observability;
pub mod scoring;
