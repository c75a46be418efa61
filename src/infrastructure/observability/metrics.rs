//! Lookup metrics
//!
//! Recorded through the `metrics` facade; the embedding application decides
//! whether an exporter is installed.

use std::time::Duration;

use metrics::{counter, histogram};

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

fn outcome_label(hit: bool) -> &'static str {
    if hit {
        "hit"
    } else {
        "miss"
    }
}

/// Record a cache lookup outcome
pub fn record_cache_lookup(kind: &str, hit: bool) {
    let labels = [
        ("kind", kind.to_string()),
        ("outcome", outcome_label(hit).to_string()),
    ];

    counter!("remedy_cache_lookups_total", &labels).increment(1);
}

/// Record the result of a background refresh
pub fn record_refresh(kind: &str, success: bool) {
    let labels = [
        ("kind", kind.to_string()),
        ("status", status_label(success).to_string()),
    ];

    counter!("remedy_cache_refreshes_total", &labels).increment(1);
}

/// Record a foreground fetch against the remote source
pub fn record_fetch(kind: &str, duration: Duration, success: bool) {
    let labels = [
        ("kind", kind.to_string()),
        ("status", status_label(success).to_string()),
    ];

    counter!("remedy_fetches_total", &labels).increment(1);
    histogram!("remedy_fetch_duration_seconds", &labels).record(duration.as_secs_f64());
}
