//! Backing store factory for runtime selection

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::cache::BackingStore;
use crate::domain::DomainError;

use super::file::{FileBackingStore, FileBackingStoreConfig};
use super::in_memory::InMemoryBackingStore;
use super::redis::{RedisBackingStore, RedisBackingStoreConfig};

/// Supported backing store types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackingStoreType {
    /// Process-local store, lost on exit
    InMemory,
    /// JSON file per namespace
    #[default]
    File,
    /// Redis keys under a namespace prefix
    Redis,
}

impl std::fmt::Display for BackingStoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackingStoreType::InMemory => write!(f, "in_memory"),
            BackingStoreType::File => write!(f, "file"),
            BackingStoreType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for BackingStoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(BackingStoreType::InMemory),
            "file" | "disk" => Ok(BackingStoreType::File),
            "redis" => Ok(BackingStoreType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: in_memory, file, redis",
                s
            ))),
        }
    }
}

/// Configuration for the backing store factory
#[derive(Debug, Clone)]
pub struct BackingStoreConfig {
    pub store_type: BackingStoreType,
    /// Namespace separating this cache from other data in the same store
    pub namespace: String,
    /// Directory for the file store
    pub directory: PathBuf,
    /// Redis URL (required for the Redis store)
    pub redis_url: Option<String>,
}

impl Default for BackingStoreConfig {
    fn default() -> Self {
        Self {
            store_type: BackingStoreType::default(),
            namespace: "remedies".to_string(),
            directory: PathBuf::from(".homeopathika"),
            redis_url: None,
        }
    }
}

impl BackingStoreConfig {
    pub fn in_memory() -> Self {
        Self {
            store_type: BackingStoreType::InMemory,
            ..Default::default()
        }
    }

    pub fn file(directory: impl Into<PathBuf>) -> Self {
        Self {
            store_type: BackingStoreType::File,
            directory: directory.into(),
            ..Default::default()
        }
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            store_type: BackingStoreType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Factory for creating backing stores
#[derive(Debug, Default)]
pub struct BackingStoreFactory;

impl BackingStoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a backing store based on configuration
    pub async fn create(
        &self,
        config: &BackingStoreConfig,
    ) -> Result<Arc<dyn BackingStore>, DomainError> {
        match config.store_type {
            BackingStoreType::InMemory => Ok(Arc::new(InMemoryBackingStore::new())),
            BackingStoreType::File => {
                let file_config =
                    FileBackingStoreConfig::new(config.directory.clone(), config.namespace.clone());
                Ok(Arc::new(FileBackingStore::new(file_config)))
            }
            BackingStoreType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for the redis cache backend")
                })?;

                let redis_config =
                    RedisBackingStoreConfig::new(url).with_namespace(config.namespace.clone());
                let store = RedisBackingStore::new(redis_config).await?;
                Ok(Arc::new(store))
            }
        }
    }
}
