//! Configuration System
//!
//! Loads configuration from YAML files with a cascading priority system:
//! 1. `./meshroute.yaml` (current directory - highest priority)
//! 2. `~/.config/meshroute/meshroute.yaml` (user config directory)
//! 3. `/etc/meshroute/meshroute.yaml` (system - lowest priority)
//!
//! Values from higher priority files override those from lower priority files.
//!
//! # YAML Structure
//!
//! ```yaml
//! router:
//!   identity:
//!     secret: "0102...1f20"
//!   ping:
//!     timeout_ms: 5000
//!   peers:
//!     queue_depth: 64
//!     local_queue_depth: 256
//! ```

mod router;

use crate::{Identity, IdentityError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use router::{IdentityConfig, PeersConfig, PingConfig, RouterConfig};

/// Default config filename.
const CONFIG_FILENAME: &str = "meshroute.yaml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Router configuration (`router.*`).
    #[serde(default)]
    pub router: RouterConfig,
}

impl Config {
    /// Create a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the standard search paths.
    ///
    /// Returns the merged config and the paths that were actually loaded.
    pub fn load() -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let search_paths = Self::search_paths();
        Self::load_from_paths(&search_paths)
    }

    /// Load configuration from specific paths.
    ///
    /// Paths are processed in order, with later paths overriding earlier ones.
    /// Missing files are skipped.
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<(Self, Vec<PathBuf>), ConfigError> {
        let mut config = Config::default();
        let mut loaded_paths = Vec::new();

        for path in paths {
            if path.exists() {
                let file_config = Self::load_file(path)?;
                config.merge(file_config);
                loaded_paths.push(path.clone());
            }
        }

        Ok((config, loaded_paths))
    }

    /// Load configuration from a single file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the standard search paths in priority order (lowest to highest).
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        paths.push(PathBuf::from("/etc/meshroute").join(CONFIG_FILENAME));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("meshroute").join(CONFIG_FILENAME));
        }

        paths.push(PathBuf::from(".").join(CONFIG_FILENAME));

        paths
    }

    /// Merge another configuration into this one.
    ///
    /// Every value set in `other` wins, including one set to its default.
    pub fn merge(&mut self, other: Config) {
        let other = other.router;
        let router = &mut self.router;

        if other.identity.secret.is_some() {
            router.identity.secret = other.identity.secret;
        }
        if other.ping.timeout_ms.is_some() {
            router.ping.timeout_ms = other.ping.timeout_ms;
        }
        if other.peers.queue_depth.is_some() {
            router.peers.queue_depth = other.peers.queue_depth;
        }
        if other.peers.local_queue_depth.is_some() {
            router.peers.local_queue_depth = other.peers.local_queue_depth;
        }
    }

    /// Create an Identity from this configuration.
    ///
    /// Uses the configured secret if present, otherwise generates a new one.
    pub fn create_identity(&self) -> Result<Identity, ConfigError> {
        match &self.router.identity.secret {
            Some(secret) => Ok(Identity::from_secret_str(secret)?),
            None => Ok(Identity::generate()),
        }
    }

    /// Check if an identity is configured (vs. will be generated).
    pub fn has_identity(&self) -> bool {
        self.router.identity.secret.is_some()
    }

    /// Serialize this configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
