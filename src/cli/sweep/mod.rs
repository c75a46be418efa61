//! Sweep command - removes expired cache entries for every lookup kind

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::domain::lookup::LookupKind;
use crate::infrastructure::cache::CacheStore;

#[derive(Debug, Serialize)]
struct SweepReport {
    removed: usize,
    remaining: usize,
}

pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    let mut report = BTreeMap::new();

    for kind in [LookupKind::MateriaMedica, LookupKind::Repertory] {
        let backend = super::backing_store(&config, kind).await;
        let cache = CacheStore::with_config(backend, config.cache.store());

        let removed = cache.sweep_expired().await;
        let remaining = cache.len().await;

        info!(kind = %kind, removed, remaining, "Swept cache");
        report.insert(kind.to_string(), SweepReport { removed, remaining });
    }

    super::print_json(&report)
}
