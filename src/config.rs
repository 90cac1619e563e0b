//! Configuration for the multigraph manager
//!
//! Loaded from YAML (default) or JSON. Every field has a default, so an
//! empty document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid YAML document
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid JSON document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What `unregister` does when asked to remove the active graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnregisterActivePolicy {
    /// Remove the graph and clear the active pointer
    #[default]
    Clear,
    /// Refuse; the caller must clear or move the active pointer first
    Reject,
}

/// Multigraph manager settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiGraphConfig {
    /// Maximum number of registered graphs (None = unlimited)
    pub max_graphs: Option<usize>,
    /// Policy for unregistering the active graph
    pub unregister_active: UnregisterActivePolicy,
}

impl Default for MultiGraphConfig {
    fn default() -> Self {
        Self {
            max_graphs: None,
            unregister_active: UnregisterActivePolicy::Clear,
        }
    }
}

impl MultiGraphConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        debug!("Loading multigraph config from {}", path.display());

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}
