use anyhow::{Context, Result};
use catalog_engine::EngineConfig;
use catalog_store::{DocumentStore, FirestoreConfig, FirestoreStore, MemoryStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Environment variable consulted when the config carries no access token.
const ACCESS_TOKEN_ENV: &str = "FIRESTORE_ACCESS_TOKEN";

/// Which document store backs the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-process store, optionally seeded from a JSON fixture.
    Memory {
        #[serde(default)]
        fixture: Option<PathBuf>,
    },
    Firestore(FirestoreConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory { fixture: None }
    }
}

/// Contents of the TOML config file.
///
/// ```toml
/// [engine]
/// page_size = 8
/// debounce_ms = 300
///
/// [store]
/// kind = "memory"
/// fixture = "fixtures/products.json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub store: StoreConfig,
}

impl CliConfig {
    /// Parses a TOML document.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid catalog config")
    }

    /// Loads the config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("in {}", path.display()))
    }
}

/// Creates the configured store for the catalog `collection`.
pub fn build_store(config: &StoreConfig, collection: &str) -> Result<Arc<dyn DocumentStore>> {
    match config {
        StoreConfig::Memory { fixture: Some(path) } => {
            let store = MemoryStore::from_fixture(collection, path)
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            info!(fixture = %path.display(), "using in-memory store");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory { fixture: None } => {
            warn!("in-memory store without a fixture, the catalog is empty");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreConfig::Firestore(firestore) => {
            let mut firestore = firestore.clone();
            if firestore.project_id.is_empty() {
                anyhow::bail!("[store] project_id is required for kind = \"firestore\"");
            }
            if firestore.access_token.is_none() {
                firestore.access_token = std::env::var(ACCESS_TOKEN_ENV).ok();
            }
            info!(project = %firestore.project_id, "using Firestore store");
            Ok(Arc::new(FirestoreStore::new(firestore)))
        }
    }
}
