//! In-memory backing store using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::{page_bounds, BackingStore, CacheEntry, ScanPage};
use crate::domain::DomainError;

/// Process-local backing store
///
/// The moka cache itself is unbounded; expiry and trimming belong to the
/// cache store.
#[derive(Debug, Clone)]
pub struct InMemoryBackingStore {
    cache: MokaCache<String, CacheEntry>,
}

impl InMemoryBackingStore {
    pub fn new() -> Self {
        Self {
            cache: MokaCache::builder().build(),
        }
    }

    async fn sorted_entries(&self) -> Vec<CacheEntry> {
        self.cache.run_pending_tasks().await;

        let mut entries: Vec<CacheEntry> = self.cache.iter().map(|(_, entry)| entry).collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackingStore for InMemoryBackingStore {
    async fn ensure_namespace(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        self.cache.insert(entry.key.clone(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        Ok(self
            .sorted_entries()
            .await
            .into_iter()
            .map(|entry| entry.key)
            .collect())
    }

    async fn scan(&self, cursor: u64, count: usize) -> Result<ScanPage, DomainError> {
        let entries = self.sorted_entries().await;
        let start = (cursor as usize).min(entries.len());
        let (end, next_cursor) = page_bounds(entries.len(), cursor, count);

        Ok(ScanPage {
            entries: entries[start..end].to_vec(),
            next_cursor,
        })
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn entry(key: &str, value: &str) -> CacheEntry {
        CacheEntry::new(key, serde_json::json!(value), Utc::now(), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryBackingStore::new();
        store.put(entry("sepia", "v")).await.unwrap();

        let found = store.get("sepia").await.unwrap().unwrap();
        assert_eq!(found.value, serde_json::json!("v"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryBackingStore::new();
        store.put(entry("sepia", "v1")).await.unwrap();
        store.put(entry("sepia", "v2")).await.unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["sepia"]);
        assert_eq!(
            store.get("sepia").await.unwrap().unwrap().value,
            serde_json::json!("v2")
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryBackingStore::new();
        store.put(entry("sepia", "v")).await.unwrap();

        assert!(store.delete("sepia").await.unwrap());
        assert!(!store.delete("sepia").await.unwrap());
        assert!(store.get("sepia").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_pages() {
        let store = InMemoryBackingStore::new();
        for key in ["a", "b", "c", "d", "e"] {
            store.put(entry(key, key)).await.unwrap();
        }

        let first = store.scan(0, 2).await.unwrap();
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.next_cursor, Some(2));

        let last = store.scan(4, 2).await.unwrap();
        assert_eq!(last.entries[0].key, "e");
        assert_eq!(last.next_cursor, None);

        assert_eq!(store.entries().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryBackingStore::new();
        store.put(entry("a", "1")).await.unwrap();
        store.put(entry("b", "2")).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }
}
