//! Persistent endpoint configuration.
//!
//! A single durable slot holding the registry service URL. The resolution
//! order is stored value, then the `PATRIMONIO_REGISTRY_URL` environment
//! variable, then nothing. Values round-trip exactly as given; trimming and
//! normalization are the caller's business.

use crate::config::{AppConfig, PathsConfig};
use crate::storage;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The persisted slot (the JSON root object).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EndpointSettings {
    url: String,
}

/// Durable store for the registry endpoint URL.
pub struct EndpointStore {
    path: PathBuf,
}

impl EndpointStore {
    /// Create a store backed by `{data_dir}/endpoint.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PathsConfig::ENDPOINT_FILENAME),
        }
    }

    /// The stored URL, the environment default, or `None`.
    pub fn get(&self) -> Option<String> {
        match storage::read_json::<EndpointSettings>(&self.path) {
            Ok(Some(settings)) => return Some(settings.url),
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to read endpoint settings at {}: {}", self.path.display(), e);
            }
        }
        std::env::var(AppConfig::ENDPOINT_ENV_VAR).ok()
    }

    /// Persist `url`, replacing any prior value.
    pub fn set(&self, url: &str) -> Result<()> {
        debug!("Storing registry endpoint");
        storage::write_json(&self.path, &EndpointSettings { url: url.to_string() })
    }

    /// Remove the stored slot. The environment default, if any, applies
    /// again afterwards.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| crate::PatrimonioError::storage_with_path(e, &self.path))?;
        }
        Ok(())
    }

    /// True iff `get()` yields a non-empty URL that does not still contain
    /// the deployment template's placeholder marker.
    pub fn is_configured(&self) -> bool {
        match self.get() {
            Some(url) => !url.is_empty() && !url.contains(AppConfig::PLACEHOLDER_MARKER),
            None => false,
        }
    }
}
