//! TTL cache over a backing store
//!
//! The cache is an optimization only: every backing-store failure is logged
//! and turned into a miss or a no-op.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::domain::cache::{BackingStore, CacheEntry, Clock, SystemClock};

/// Configuration for the cache store
#[derive(Debug, Clone)]
pub struct CacheStoreConfig {
    /// Maximum number of entries kept after each write
    pub max_entries: usize,
    /// TTL applied by `put`
    pub default_ttl: Duration,
}

impl Default for CacheStoreConfig {
    fn default() -> Self {
        Self {
            max_entries: 200,
            default_ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl CacheStoreConfig {
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Query→response cache with TTL expiry and oldest-first trimming
#[derive(Debug)]
pub struct CacheStore {
    backend: Arc<dyn BackingStore>,
    clock: Arc<dyn Clock>,
    config: CacheStoreConfig,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn BackingStore>) -> Self {
        Self::with_config(backend, CacheStoreConfig::default())
    }

    pub fn with_config(backend: Arc<dyn BackingStore>, config: CacheStoreConfig) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Creates the namespace if needed and sweeps entries that expired while the process was down
    pub async fn open(backend: Arc<dyn BackingStore>, config: CacheStoreConfig) -> Self {
        let store = Self::with_config(backend, config);
        store.initialize().await;
        store
    }

    /// Session start routine, see [`CacheStore::open`]
    pub async fn initialize(&self) {
        if let Err(e) = self.backend.ensure_namespace().await {
            warn!(error = %e, "Cache storage unavailable, continuing without cache");
            return;
        }

        let removed = self.sweep_expired().await;
        if removed > 0 {
            debug!(removed, "Swept expired cache entries");
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.config.default_ttl
    }

    pub fn max_entries(&self) -> usize {
        self.config.max_entries
    }

    /// Returns the cached value, or `None` if missing, expired, unreadable or the store failed
    pub async fn get<V>(&self, key: &str) -> Option<V>
    where
        V: DeserializeOwned,
    {
        let entry = match self.backend.get(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            debug!(key, "Cache entry expired");
            if let Err(e) = self.backend.delete(key).await {
                warn!(key, error = %e, "Failed to delete expired cache entry");
            }
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Failed to deserialize cache value");
                None
            }
        }
    }

    /// Stores a value with the default TTL
    pub async fn put<V>(&self, key: &str, value: &V)
    where
        V: Serialize + ?Sized,
    {
        self.put_with_ttl(key, value, self.config.default_ttl).await;
    }

    /// Stores a value, replacing any previous entry and resetting its write time
    pub async fn put_with_ttl<V>(&self, key: &str, value: &V, ttl: Duration)
    where
        V: Serialize + ?Sized,
    {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize cache value");
                return;
            }
        };

        let entry = CacheEntry::new(key, value, self.clock.now(), ttl);

        if let Err(e) = self.backend.put(entry).await {
            warn!(key, error = %e, "Cache write failed");
            return;
        }

        self.trim().await;
    }

    /// Deletes every expired entry and returns how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let entries = match self.backend.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Cache sweep failed");
                return 0;
            }
        };

        let now = self.clock.now();
        let mut removed = 0;

        for entry in entries.iter().filter(|e| e.is_expired(now)) {
            match self.backend.delete(&entry.key).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(key = %entry.key, error = %e, "Failed to delete expired cache entry"),
            }
        }

        removed
    }

    /// Number of stored entries, expired ones included until swept
    pub async fn len(&self) -> usize {
        match self.backend.keys().await {
            Ok(keys) => keys.len(),
            Err(e) => {
                warn!(error = %e, "Failed to count cache entries");
                0
            }
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        if let Err(e) = self.backend.clear().await {
            warn!(error = %e, "Failed to clear cache");
        }
    }

    async fn trim(&self) {
        let mut entries = match self.backend.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Cache trim failed");
                return;
            }
        };

        if entries.len() <= self.config.max_entries {
            return;
        }

        let excess = entries.len() - self.config.max_entries;
        entries.sort_by(|a, b| a.stored_at.cmp(&b.stored_at));

        for entry in entries.into_iter().take(excess) {
            if let Err(e) = self.backend.delete(&entry.key).await {
                warn!(key = %entry.key, error = %e, "Failed to evict cache entry");
            }
        }

        debug!(evicted = excess, "Trimmed cache");
    }
}
