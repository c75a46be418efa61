use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::lookup::LookupKind;
use crate::domain::scoring::ScoringWeights;
use crate::infrastructure::cache::{BackingStoreConfig, BackingStoreType, CacheStoreConfig};
use crate::infrastructure::lookup::{HttpSourceConfig, LookupServiceConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub scoring: ScoringWeights,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: BackingStoreType,
    pub namespace: String,
    pub directory: PathBuf,
    pub redis_url: Option<String>,
    pub max_entries: usize,
    pub default_ttl_secs: u64,
    pub background_refresh: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub materia_medica_path: String,
    pub repertory_path: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackingStoreType::default(),
            namespace: "remedies".to_string(),
            directory: PathBuf::from(".homeopathika"),
            redis_url: None,
            max_entries: 200,
            default_ttl_secs: 24 * 3600,
            background_refresh: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let http = HttpSourceConfig::default();

        Self {
            base_url: http.base_url,
            materia_medica_path: http.materia_medica_path,
            repertory_path: http.repertory_path,
            timeout_secs: http.timeout.as_secs(),
            token: None,
        }
    }
}

impl CacheConfig {
    /// Backing store settings; each lookup kind gets its own namespace
    pub fn backing_store(&self, kind: LookupKind) -> BackingStoreConfig {
        BackingStoreConfig {
            store_type: self.backend,
            namespace: format!("{}-{}", self.namespace, kind),
            directory: self.directory.clone(),
            redis_url: self.redis_url.clone(),
        }
    }

    pub fn store(&self) -> CacheStoreConfig {
        CacheStoreConfig::default()
            .with_max_entries(self.max_entries)
            .with_default_ttl(Duration::from_secs(self.default_ttl_secs))
    }

    pub fn lookup(&self, kind: LookupKind) -> LookupServiceConfig {
        let config = LookupServiceConfig::for_kind(kind);
        if self.background_refresh {
            config
        } else {
            config.without_background_refresh()
        }
    }
}

impl ApiConfig {
    pub fn http_source(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            base_url: self.base_url.clone(),
            materia_medica_path: self.materia_medica_path.clone(),
            repertory_path: self.repertory_path.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            token: self.token.clone().filter(|t| !t.is_empty()),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("HOMEOPATHIKA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
