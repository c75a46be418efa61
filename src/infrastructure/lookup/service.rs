//! Stale-while-revalidate remedy lookups

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::{AbortHandle, Abortable};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::cache::normalize_query;
use crate::domain::lookup::{FetchError, LookupKind, RemedySource};
use crate::domain::remedy::LookupPayload;
use crate::domain::scoring::RemedyScorer;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::observability::{record_cache_lookup, record_fetch, record_refresh};

/// Outcome of a lookup before anything is written back
#[derive(Debug)]
enum Answer {
    Cached(LookupPayload),
    Fetched { key: String, payload: LookupPayload },
}

/// Configuration for the lookup service
#[derive(Debug, Clone)]
pub struct LookupServiceConfig {
    /// Lookup screen this service answers for, used in logs and metrics
    pub kind: LookupKind,
    /// Whether a cache hit triggers a background refresh
    pub background_refresh: bool,
}

impl Default for LookupServiceConfig {
    fn default() -> Self {
        Self {
            kind: LookupKind::default(),
            background_refresh: true,
        }
    }
}

impl LookupServiceConfig {
    pub fn for_kind(kind: LookupKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn without_background_refresh(mut self) -> Self {
        self.background_refresh = false;
        self
    }
}

/// Serves lookups from the cache and keeps cached answers fresh
#[derive(Debug)]
pub struct RemedyLookupService {
    cache: Arc<CacheStore>,
    scorer: Arc<dyn RemedyScorer>,
    config: LookupServiceConfig,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
    refreshes: Mutex<Vec<JoinHandle<()>>>,
}

impl RemedyLookupService {
    pub fn new(cache: Arc<CacheStore>, scorer: Arc<dyn RemedyScorer>) -> Self {
        Self::with_config(cache, scorer, LookupServiceConfig::default())
    }

    pub fn with_config(
        cache: Arc<CacheStore>,
        scorer: Arc<dyn RemedyScorer>,
        config: LookupServiceConfig,
    ) -> Self {
        Self {
            cache,
            scorer,
            config,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            refreshes: Mutex::new(Vec::new()),
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    pub fn kind(&self) -> LookupKind {
        self.config.kind
    }

    /// Returns the cached answer when present, otherwise fetches, scores and caches it
    ///
    /// A hit is returned without waiting on the network; when background
    /// refresh is enabled the entry is re-fetched and overwritten afterwards,
    /// and refresh failures are only logged.
    pub async fn fetch_with_cache(
        &self,
        query: &str,
        source: Arc<dyn RemedySource>,
    ) -> Result<LookupPayload, FetchError> {
        let answer = self.lookup(query, source).await?;
        self.settle(answer, None).await
    }

    /// Like [`fetch_with_cache`](Self::fetch_with_cache), but a newer call supersedes this one
    ///
    /// The previous in-flight lookup is aborted and returns
    /// [`FetchError::Cancelled`]; a superseded response is never cached.
    /// Only the network wait is abortable: the write happens after the
    /// lookup is known to be current and always runs to completion.
    pub async fn fetch_latest(
        &self,
        query: &str,
        source: Arc<dyn RemedySource>,
    ) -> Result<LookupPayload, FetchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (handle, registration) = AbortHandle::new_pair();

        if let Some(previous) = self.replace_in_flight(Some(handle)) {
            previous.abort();
        }

        let answer = match Abortable::new(self.lookup(query, source), registration).await {
            Ok(result) => result?,
            Err(_) => {
                debug!(query, "Lookup superseded");
                return Err(FetchError::Cancelled);
            }
        };

        self.settle(answer, Some(generation)).await
    }

    /// Aborts the lookup started by the last [`fetch_latest`](Self::fetch_latest) call
    pub fn cancel_in_flight(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(handle) = self.replace_in_flight(None) {
            handle.abort();
        }
    }

    /// Fetches and caches a fresh answer regardless of what is cached
    pub async fn refresh(
        &self,
        query: &str,
        source: Arc<dyn RemedySource>,
    ) -> Result<LookupPayload, FetchError> {
        let key = Self::cache_key(query)?;
        let payload = self.fetch_scored(query.trim(), &key, source.as_ref()).await?;
        self.cache.put(&key, &payload).await;
        Ok(payload)
    }

    /// Waits for every background refresh spawned so far
    pub async fn drain_refreshes(&self) {
        let pending = {
            let mut guard = self
                .refreshes
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::take(&mut *guard)
        };

        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "Background refresh task failed");
            }
        }
    }

    fn cache_key(query: &str) -> Result<String, FetchError> {
        let key = normalize_query(query);
        if key.is_empty() {
            return Err(FetchError::InvalidQuery);
        }
        Ok(key)
    }

    fn replace_in_flight(&self, handle: Option<AbortHandle>) -> Option<AbortHandle> {
        let mut guard = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, handle)
    }

    fn is_superseded(&self, generation: Option<u64>) -> bool {
        generation.is_some_and(|g| g != self.generation.load(Ordering::SeqCst))
    }

    async fn lookup(
        &self,
        query: &str,
        source: Arc<dyn RemedySource>,
    ) -> Result<Answer, FetchError> {
        let key = Self::cache_key(query)?;
        let kind = self.config.kind.to_string();

        if let Some(cached) = self.cache.get::<LookupPayload>(&key).await {
            debug!(key = %key, kind = %kind, "Cache hit");
            record_cache_lookup(&kind, true);

            if self.config.background_refresh {
                self.spawn_refresh(query.trim().to_string(), key, source);
            }

            return Ok(Answer::Cached(cached));
        }

        debug!(key = %key, kind = %kind, "Cache miss");
        record_cache_lookup(&kind, false);

        let payload = self.fetch_scored(query.trim(), &key, source.as_ref()).await?;
        Ok(Answer::Fetched { key, payload })
    }

    /// Writes a fetched answer back unless `generation` has been superseded
    async fn settle(&self, answer: Answer, generation: Option<u64>) -> Result<LookupPayload, FetchError> {
        if self.is_superseded(generation) {
            debug!("Dropping superseded lookup result");
            return Err(FetchError::Cancelled);
        }

        match answer {
            Answer::Cached(payload) => Ok(payload),
            Answer::Fetched { key, payload } => {
                self.cache.put(&key, &payload).await;
                Ok(payload)
            }
        }
    }

    async fn fetch_scored(
        &self,
        query: &str,
        key: &str,
        source: &dyn RemedySource,
    ) -> Result<LookupPayload, FetchError> {
        let kind = self.config.kind.to_string();
        let started = Instant::now();
        let result = source.fetch(query).await;
        record_fetch(&kind, started.elapsed(), result.is_ok());

        let mut payload = result.map_err(|cause| {
            warn!(key, kind = %kind, error = %cause, "Remedy lookup failed");
            FetchError::network(cause)
        })?;

        self.scorer.score_payload(&mut payload, query);
        Ok(payload)
    }

    fn spawn_refresh(&self, query: String, key: String, source: Arc<dyn RemedySource>) {
        let cache = self.cache.clone();
        let scorer = self.scorer.clone();
        let kind = self.config.kind.to_string();

        let handle = tokio::spawn(async move {
            match source.fetch(&query).await {
                Ok(mut payload) => {
                    scorer.score_payload(&mut payload, &query);
                    cache.put(&key, &payload).await;
                    record_refresh(&kind, true);
                    debug!(key = %key, kind = %kind, "Refreshed cache entry");
                }
                Err(e) => {
                    record_refresh(&kind, false);
                    warn!(key = %key, kind = %kind, error = %e, "Background refresh failed");
                }
            }
        });

        let mut refreshes = self
            .refreshes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        refreshes.retain(|h| !h.is_finished());
        refreshes.push(handle);
    }
}
