//! Configuration loaded from a TOML file.
//!
//! ```toml
//! [store]
//! query_endpoint = "http://localhost:9999/bigdata/namespace/wdq/sparql"
//! timeout_secs = 30
//!
//! [namespace]
//! host = "www.wikidata.org"
//!
//! [sync]
//! reachability_batch_size = 50
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::uris::{EntityUris, DEFAULT_HOST};

/// Default SPARQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9999/bigdata/namespace/wdq/sparql";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub store: StoreSettings,
    pub namespace: NamespaceSettings,
    pub sync: SyncSettings,
}

/// Connection settings for a SPARQL endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub query_endpoint: String,
    /// Falls back to `query_endpoint` when unset.
    pub update_endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            query_endpoint: DEFAULT_ENDPOINT.to_string(),
            update_endpoint: None,
            timeout_secs: 30,
        }
    }
}

impl StoreSettings {
    pub fn update_endpoint(&self) -> &str {
        self.update_endpoint.as_deref().unwrap_or(&self.query_endpoint)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamespaceSettings {
    pub host: String,
}

impl Default for NamespaceSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
        }
    }
}

/// Tuning for the sync engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Reference URIs checked per reachability query.
    pub reachability_batch_size: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            reachability_batch_size: 50,
        }
    }
}

impl SyncConfig {
    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.store.query_endpoint.trim().is_empty() {
            return Err(CoreError::config("store.query_endpoint must not be empty"));
        }
        if self.namespace.host.trim().is_empty() {
            return Err(CoreError::config("namespace.host must not be empty"));
        }
        if self.sync.reachability_batch_size == 0 {
            return Err(CoreError::config("sync.reachability_batch_size must be at least 1"));
        }
        Ok(())
    }

    pub fn uris(&self) -> EntityUris {
        EntityUris::new(&self.namespace.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::from_toml("").unwrap();
        assert_eq!(config.store.query_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.store.update_endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.sync.reachability_batch_size, 50);
        assert_eq!(config.uris(), EntityUris::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SyncConfig::from_toml(
            r#"
            [store]
            query_endpoint = "http://q"
            update_endpoint = "http://u"

            [sync]
            reachability_batch_size = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.store.query_endpoint, "http://q");
        assert_eq!(config.store.update_endpoint(), "http://u");
        assert_eq!(config.store.timeout_secs, 30);
        assert_eq!(config.sync.reachability_batch_size, 5);
    }

    #[test]
    fn test_rejects_zero_batch() {
        let err = SyncConfig::from_toml("[sync]\nreachability_batch_size = 0").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = SyncConfig::load(Path::new("/nonexistent/triplesync.toml")).unwrap();
        assert_eq!(config.namespace.host, DEFAULT_HOST);
    }
}
