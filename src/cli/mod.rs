//! CLI module for Homeopathika lookups
//!
//! Subcommands:
//! - `lookup`: cached materia medica or repertory search
//! - `compare`: keynote comparison of two or three remedies
//! - `highlight`: mark query terms in a snippet
//! - `sweep`: drop expired cache entries

pub mod compare;
pub mod highlight;
pub mod lookup;
pub mod sweep;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::domain::cache::BackingStore;
use crate::domain::lookup::LookupKind;
use crate::infrastructure::cache::{BackingStoreFactory, CacheStore, InMemoryBackingStore};
use crate::infrastructure::logging;
use crate::infrastructure::lookup::{HttpRemedySource, RemedyLookupService};
use crate::infrastructure::scoring::HeuristicScorer;

/// Homeopathika - cached remedy lookups with confidence scores
#[derive(Parser)]
#[command(name = "homeopathika")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up a remedy or rubric, serving cached answers first
    Lookup(lookup::LookupArgs),

    /// Compare the keynotes of two or three remedies
    Compare(compare::CompareArgs),

    /// Highlight query terms in a piece of text
    Highlight(highlight::HighlightArgs),

    /// Remove expired entries from the cache
    Sweep,
}

/// Loads configuration and installs logging
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.scoring.validate()?;
    logging::init_logging(&config.logging);

    Ok(config)
}

/// Creates the backing store for one lookup kind
///
/// An unreachable backing store degrades to an in-memory one for this run.
pub(crate) async fn backing_store(config: &AppConfig, kind: LookupKind) -> Arc<dyn BackingStore> {
    match BackingStoreFactory::new()
        .create(&config.cache.backing_store(kind))
        .await
    {
        Ok(backend) => backend,
        Err(e) => {
            warn!(error = %e, backend = %config.cache.backend, "Cache backend unavailable, using memory");
            Arc::new(InMemoryBackingStore::new())
        }
    }
}

/// Opens the cache for one lookup kind, sweeping expired entries
pub(crate) async fn open_cache(config: &AppConfig, kind: LookupKind) -> Arc<CacheStore> {
    let backend = backing_store(config, kind).await;
    Arc::new(CacheStore::open(backend, config.cache.store()).await)
}

/// Builds the lookup service and its HTTP source for one lookup kind
pub(crate) async fn lookup_context(
    config: &AppConfig,
    kind: LookupKind,
) -> anyhow::Result<(RemedyLookupService, Arc<HttpRemedySource>)> {
    let cache = open_cache(config, kind).await;
    let scorer = Arc::new(HeuristicScorer::new(config.scoring));
    let service = RemedyLookupService::with_config(cache, scorer, config.cache.lookup(kind));
    let source = Arc::new(HttpRemedySource::new(&config.api.http_source(), kind)?);

    Ok((service, source))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
