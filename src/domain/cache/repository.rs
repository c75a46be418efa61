//! Backing store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::entry::CacheEntry;
use crate::domain::DomainError;

/// One page of a cursor scan over a backing store
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    /// Entries in this page
    pub entries: Vec<CacheEntry>,
    /// Cursor for the next page, `None` once the scan is complete
    pub next_cursor: Option<u64>,
}

/// Persistent key-value store holding cache entries for one namespace
///
/// Implementations only persist entries; expiry and trimming are decided by
/// the cache store on top.
#[async_trait]
pub trait BackingStore: Send + Sync + Debug {
    /// Creates the namespace if it does not exist yet
    async fn ensure_namespace(&self) -> Result<(), DomainError>;

    /// Gets an entry by key
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Writes an entry, replacing any entry with the same key
    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Deletes an entry, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Lists all keys in the namespace
    async fn keys(&self) -> Result<Vec<String>, DomainError>;

    /// Returns the page of entries starting at `cursor` (0 starts a new scan)
    async fn scan(&self, cursor: u64, count: usize) -> Result<ScanPage, DomainError>;

    /// Collects every entry by draining the cursor
    async fn entries(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let mut entries = Vec::new();
        let mut cursor = 0u64;

        loop {
            let page = self.scan(cursor, 100).await?;
            entries.extend(page.entries);

            match page.next_cursor {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Ok(entries)
    }

    /// Deletes every entry in the namespace
    async fn clear(&self) -> Result<(), DomainError> {
        for key in self.keys().await? {
            self.delete(&key).await?;
        }
        Ok(())
    }
}

/// Pages through a sorted key list the way the offset-based stores do
pub(crate) fn page_bounds(total: usize, cursor: u64, count: usize) -> (usize, Option<u64>) {
    let start = (cursor as usize).min(total);
    let end = start.saturating_add(count.max(1)).min(total);
    let next = if end < total { Some(end as u64) } else { None };
    (end, next)
}
