//! Redis backing store

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::{namespaced, BackingStore, CacheEntry, ScanPage};
use crate::domain::DomainError;

/// Configuration for the Redis backing store
#[derive(Debug, Clone)]
pub struct RedisBackingStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix separating this cache from other data in the database
    pub namespace: String,
}

impl Default for RedisBackingStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            namespace: "homeopathika:remedies".to_string(),
        }
    }
}

impl RedisBackingStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Backing store keeping each entry as a JSON string under `<namespace>:<key>`
#[derive(Clone)]
pub struct RedisBackingStore {
    connection: ConnectionManager,
    config: RedisBackingStoreConfig,
}

impl fmt::Debug for RedisBackingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackingStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisBackingStore {
    pub async fn new(config: RedisBackingStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::storage(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        namespaced(&self.config.namespace, key)
    }

    fn match_pattern(&self) -> String {
        self.prefix_key("*")
    }

    fn strip_prefix<'a>(&self, key: &'a str) -> &'a str {
        if self.config.namespace.is_empty() {
            return key;
        }

        key.strip_prefix(self.config.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(key)
    }

    fn decode(key: &str, raw: &str) -> Result<CacheEntry, DomainError> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::storage(format!("Corrupt entry '{}': {}", key, e)))
    }

    async fn scan_keys(&self, cursor: u64, count: usize) -> Result<(u64, Vec<String>), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(self.match_pattern())
            .arg("COUNT")
            .arg(count.max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to scan keys: {}", e)))
    }
}

#[async_trait]
impl BackingStore for RedisBackingStore {
    async fn ensure_namespace(&self) -> Result<(), DomainError> {
        // Redis namespaces are key prefixes; only check the server is reachable
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::storage(format!("Redis is unavailable: {}", e)))
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let mut conn = self.connection.clone();

        let raw: Option<String> = conn
            .get(self.prefix_key(key))
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get key '{}': {}", key, e)))?;

        raw.map(|raw| Self::decode(key, &raw)).transpose()
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let data = serde_json::to_string(&entry)
            .map_err(|e| DomainError::storage(format!("Failed to serialize entry: {}", e)))?;
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(self.prefix_key(&entry.key), data)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to set key '{}': {}", entry.key, e))
            })?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(self.prefix_key(key)).await.map_err(|e| {
            DomainError::storage(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (next, page) = self.scan_keys(cursor, 1000).await?;
            keys.extend(page.iter().map(|k| self.strip_prefix(k).to_string()));
            cursor = next;

            if cursor == 0 {
                break;
            }
        }

        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    async fn scan(&self, cursor: u64, count: usize) -> Result<ScanPage, DomainError> {
        let (next, keys) = self.scan_keys(cursor, count).await?;
        let next_cursor = if next == 0 { None } else { Some(next) };

        if keys.is_empty() {
            return Ok(ScanPage {
                entries: Vec::new(),
                next_cursor,
            });
        }

        let mut conn = self.connection.clone();
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read entries: {}", e)))?;

        let mut entries = Vec::with_capacity(values.len());
        for (key, raw) in keys.iter().zip(values) {
            // keys removed between SCAN and MGET come back as nil
            if let Some(raw) = raw {
                entries.push(Self::decode(self.strip_prefix(key), &raw)?);
            }
        }

        Ok(ScanPage {
            entries,
            next_cursor,
        })
    }
}
