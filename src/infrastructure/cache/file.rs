//! Flat-file backing store
//!
//! Each namespace is a single JSON document mapping keys to entries, kept
//! sorted so cursor offsets are stable between pages.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::cache::{page_bounds, BackingStore, CacheEntry, ScanPage};
use crate::domain::DomainError;

type Index = BTreeMap<String, CacheEntry>;

/// Configuration for the file backing store
#[derive(Debug, Clone)]
pub struct FileBackingStoreConfig {
    /// Directory holding one file per namespace
    pub directory: PathBuf,
    pub namespace: String,
}

impl FileBackingStoreConfig {
    pub fn new(directory: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            namespace: namespace.into(),
        }
    }
}

/// Backing store persisting entries in `<directory>/<namespace>.json`
#[derive(Debug)]
pub struct FileBackingStore {
    directory: PathBuf,
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileBackingStore {
    pub fn new(config: FileBackingStoreConfig) -> Self {
        let file_name = format!("{}.json", Self::encode_namespace(&config.namespace));

        Self {
            path: config.directory.join(file_name),
            directory: config.directory,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Percent-encodes a namespace into a file stem
    ///
    /// ASCII alphanumerics, `-` and `_` are kept; every other byte becomes
    /// `%XX`, so distinct namespaces always get distinct files.
    fn encode_namespace(namespace: &str) -> String {
        if namespace.is_empty() {
            return "%".to_string();
        }

        let mut stem = String::with_capacity(namespace.len());
        for byte in namespace.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                stem.push(byte as char);
            } else {
                stem.push_str(&format!("%{:02X}", byte));
            }
        }
        stem
    }

    async fn read_index(&self) -> Result<Index, DomainError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Index::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                DomainError::storage(format!(
                    "Corrupt cache file '{}': {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Index::new()),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to read cache file '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_index(&self, index: &Index) -> Result<(), DomainError> {
        let data = serde_json::to_vec(index)
            .map_err(|e| DomainError::storage(format!("Failed to serialize cache index: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, data).await.map_err(|e| {
            DomainError::storage(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;

        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to replace cache file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl BackingStore for FileBackingStore {
    async fn ensure_namespace(&self) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;

        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create cache directory '{}': {}",
                self.directory.display(),
                e
            ))
        })?;

        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => self.write_index(&Index::new()).await,
            Err(e) => Err(DomainError::storage(format!(
                "Failed to inspect cache file '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_index().await?.remove(key))
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut index = self.read_index().await?;
        index.insert(entry.key.clone(), entry);
        self.write_index(&index).await
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let _guard = self.lock.lock().await;
        let mut index = self.read_index().await?;

        if index.remove(key).is_none() {
            return Ok(false);
        }

        self.write_index(&index).await?;
        Ok(true)
    }

    async fn keys(&self) -> Result<Vec<String>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_index().await?.into_keys().collect())
    }

    async fn scan(&self, cursor: u64, count: usize) -> Result<ScanPage, DomainError> {
        let _guard = self.lock.lock().await;
        let index = self.read_index().await?;
        let start = (cursor as usize).min(index.len());
        let (end, next_cursor) = page_bounds(index.len(), cursor, count);

        Ok(ScanPage {
            entries: index.into_values().skip(start).take(end - start).collect(),
            next_cursor,
        })
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        self.write_index(&Index::new()).await
    }
}
