//! Observability infrastructure - Metrics

mod metrics;

pub use self::metrics::{record_cache_lookup, record_fetch, record_refresh};
