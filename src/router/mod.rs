//! Router Entity
//!
//! The [`Router`] is the per-node forwarding core. It owns the local
//! identity, the local-delivery peer and the probe registry, and borrows
//! routing state through the [`NextHopResolver`] and [`ProtocolHandlers`]
//! collaborators. One instance serves every link concurrently; all entry
//! points take `&self`.

mod forward;
mod ping;
mod probe;
mod routing;
mod rx_loop;
#[cfg(test)]
mod tests;

pub use ping::{PingError, PingKey, PingRegistry, PingWaiter};
pub use routing::{HandlerError, NextHop, NextHopResolver, ProtocolHandlers};

use crate::coords::PortId;
use crate::identity::PublicKey;
use crate::peer::{Peer, PeerRx};
use crate::protocol::FrameType;
use crate::{Config, ConfigError, Identity};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from forwarding a single frame.
///
/// Every variant names the port the frame arrived on and the type of the
/// frame that failed. None of them is fatal to the node or the link.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("{handler} (port {port}, frame type {frame_type}): {source}")]
    Handler {
        port: PortId,
        frame_type: FrameType,
        handler: &'static str,
        #[source]
        source: HandlerError,
    },

    #[error("no next-hop found for frame of type {frame_type} (port {port})")]
    NoRoute { port: PortId, frame_type: FrameType },

    #[error("dropping forwarded frame of type {frame_type} (port {port})")]
    Dropped { port: PortId, frame_type: FrameType },
}

impl ForwardError {
    /// Port the failing frame arrived on.
    pub fn port(&self) -> PortId {
        match self {
            ForwardError::Handler { port, .. }
            | ForwardError::NoRoute { port, .. }
            | ForwardError::Dropped { port, .. } => *port,
        }
    }

    /// Type of the frame that failed.
    pub fn frame_type(&self) -> FrameType {
        match self {
            ForwardError::Handler { frame_type, .. }
            | ForwardError::NoRoute { frame_type, .. }
            | ForwardError::Dropped { frame_type, .. } => *frame_type,
        }
    }
}

/// Errors related to router construction.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// A running router instance.
pub struct Router {
    identity: Identity,
    config: Config,
    resolver: Arc<dyn NextHopResolver>,
    handlers: Arc<dyn ProtocolHandlers>,
    /// Port-0 peer for frames that terminate at this node.
    local: Arc<Peer>,
    pings: PingRegistry,
}

impl Router {
    /// Create a router, loading its identity from configuration.
    ///
    /// Returns the router and the receiver for frames delivered to this node.
    pub fn new(
        config: Config,
        resolver: Arc<dyn NextHopResolver>,
        handlers: Arc<dyn ProtocolHandlers>,
    ) -> Result<(Self, PeerRx), RouterError> {
        let identity = config.create_identity()?;
        Ok(Self::with_identity(identity, config, resolver, handlers))
    }

    /// Create a router with a specific identity.
    pub fn with_identity(
        identity: Identity,
        config: Config,
        resolver: Arc<dyn NextHopResolver>,
        handlers: Arc<dyn ProtocolHandlers>,
    ) -> (Self, PeerRx) {
        let (local, local_rx) =
            Peer::local(identity.public_key(), config.router.peers.local_queue_depth());

        info!(
            public_key = %identity.public_key(),
            "Router created"
        );

        let router = Self {
            identity,
            config,
            resolver,
            handlers,
            local,
            pings: PingRegistry::new(),
        };
        (router, local_rx)
    }

    /// Create a neighbor link sized by `router.peers.queue_depth`.
    pub fn new_peer(&self, port: PortId, public_key: Option<PublicKey>) -> (Arc<Peer>, PeerRx) {
        Peer::new(port, public_key, self.config.router.peers.queue_depth())
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn public_key(&self) -> PublicKey {
        self.identity.public_key()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The port-0 peer representing this node.
    pub fn local_peer(&self) -> &Arc<Peer> {
        &self.local
    }

    pub fn pings(&self) -> &PingRegistry {
        &self.pings
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("public_key", &self.public_key())
            .field("pings", &self.pings)
            .finish_non_exhaustive()
    }
}
