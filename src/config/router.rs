//! Router configuration subsections.
//!
//! The `router.*` parameters: identity, probe timing and link queue sizing.
//! Unset values fall back to defaults through the accessors, so a file that
//! states a default explicitly still overrides a lower-priority file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default probe reply timeout (5 s).
const DEFAULT_PING_TIMEOUT_MS: u64 = 5_000;

/// Default outbound queue depth per neighbor link.
const DEFAULT_QUEUE_DEPTH: usize = 64;

/// Default queue depth for local delivery.
const DEFAULT_LOCAL_QUEUE_DEPTH: usize = 256;

/// Identity configuration (`router.identity.*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Hex-encoded secret key (`router.identity.secret`).
    /// If not specified, a new keypair will be generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// Probe settings (`router.ping.*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PingConfig {
    /// Reply timeout in milliseconds (`timeout_ms`). Defaults to 5000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl PingConfig {
    /// Get the reply timeout, using default if not configured.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(DEFAULT_PING_TIMEOUT_MS))
    }
}

/// Link queue sizing (`router.peers.*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeersConfig {
    /// Outbound queue depth per neighbor link (`queue_depth`). Defaults to 64.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_depth: Option<usize>,

    /// Queue depth for frames delivered to the local node
    /// (`local_queue_depth`). Defaults to 256.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_queue_depth: Option<usize>,
}

impl PeersConfig {
    /// Get the neighbor queue depth, using default if not configured.
    pub fn queue_depth(&self) -> usize {
        self.queue_depth.unwrap_or(DEFAULT_QUEUE_DEPTH)
    }

    /// Get the local delivery queue depth, using default if not configured.
    pub fn local_queue_depth(&self) -> usize {
        self.local_queue_depth.unwrap_or(DEFAULT_LOCAL_QUEUE_DEPTH)
    }
}

/// Router configuration (`router.*`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Identity (`router.identity`).
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Probes (`router.ping`).
    #[serde(default)]
    pub ping: PingConfig,
    /// Links (`router.peers`).
    #[serde(default)]
    pub peers: PeersConfig,
}
