//! Cached lookup entry

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single query→response pair held by a backing store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Normalized query key
    pub key: String,
    /// JSON-shaped payload as returned by the remote lookup
    pub value: serde_json::Value,
    /// Time of the last write
    pub stored_at: DateTime<Utc>,
    /// Lifetime in milliseconds
    pub ttl_ms: u64,
}

impl CacheEntry {
    pub fn new(
        key: impl Into<String>,
        value: serde_json::Value,
        stored_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            stored_at,
            ttl_ms: ttl.as_millis().min(u64::MAX as u128) as u64,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// An entry is stale once strictly more than `ttl` has elapsed since the write
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now
            .signed_duration_since(self.stored_at)
            .num_milliseconds();

        age_ms > 0 && age_ms as u64 > self.ttl_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_at(ms: i64, ttl_ms: u64) -> CacheEntry {
        let stored_at = Utc.timestamp_millis_opt(ms).unwrap();
        CacheEntry::new(
            "nux vomica",
            serde_json::json!({"remedy": "Nux vomica"}),
            stored_at,
            Duration::from_millis(ttl_ms),
        )
    }

    #[test]
    fn test_fresh_entry_not_expired() {
        let entry = entry_at(1_000, 500);
        let now = Utc.timestamp_millis_opt(1_400).unwrap();
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_at_exact_ttl_not_expired() {
        let entry = entry_at(1_000, 500);
        let now = Utc.timestamp_millis_opt(1_500).unwrap();
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_past_ttl_expired() {
        let entry = entry_at(1_000, 500);
        let now = Utc.timestamp_millis_opt(1_501).unwrap();
        assert!(entry.is_expired(now));
    }

    #[test]
    fn test_clock_skew_never_expires() {
        let entry = entry_at(5_000, 0);
        let now = Utc.timestamp_millis_opt(4_000).unwrap();
        assert!(!entry.is_expired(now));
    }

    #[test]
    fn test_entry_serializes_with_snake_case_fields() {
        let entry = entry_at(0, 60_000);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["key"], "nux vomica");
        assert_eq!(json["ttl_ms"], 60_000);
        assert!(json.get("stored_at").is_some());
    }
}
