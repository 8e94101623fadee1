//! RedisGraph client
//!
//! Decodes RedisGraph's compact query replies into named records:
//! - Transport seam over Redis (`redis` feature) or an in-memory mock
//! - Per-graph catalog of label, property-key and relationship-type names,
//!   hydrated lazily with one in-flight request per kind
//! - Node, relationship and scalar decoding, plus query statistics

pub mod catalog;
pub mod decode;
pub mod error;
pub mod graph;
pub mod transport;

pub use catalog::{CatalogKind, CatalogResolver, NameResolver, StaticCatalog};
pub use decode::{Node, Record, Relationship, Statistics, Value};
pub use error::{Error, Result, TransportError};
pub use graph::{Graph, QueryResult};
pub use transport::{Reply, Transport};

use serde::Deserialize;
use std::path::Path;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub redis: RedisYamlConfig,
    pub graph: GraphConfig,
}

/// Redis connection section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisYamlConfig {
    pub url: String,
}

impl Default for RedisYamlConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/".into(),
        }
    }
}

/// Options accepted by [`Graph::from_config`]
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GraphConfig {
    /// Graph key on the server; required
    pub name: String,
}

// ============================================================================
// Runtime config
// ============================================================================

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub graph: GraphConfig,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. A missing or
    /// unreadable file falls back to env vars / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> anyhow::Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            redis_url: std::env::var("REDIS_URL").unwrap_or(yaml.redis.url),
            graph: GraphConfig {
                name: std::env::var("GRAPH_NAME").unwrap_or(yaml.graph.name),
            },
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}
