//! Contracts for the routing collaborators.
//!
//! The forwarding engine does not own the spanning tree or the virtual-snake
//! path table. It consumes them through two traits: a pure next-hop lookup
//! and a set of control-message handlers that mutate shared routing state.

use crate::coords::Coordinates;
use crate::peer::Peer;
use crate::protocol::Frame;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of a next-hop lookup.
#[derive(Clone, Debug)]
pub enum NextHop {
    /// Forward through this neighbor.
    Peer(Arc<Peer>),
    /// No neighbor makes progress toward the destination.
    NoRoute,
    /// The route ends at this node.
    DeadEnd,
}

impl NextHop {
    /// True unless the lookup produced a concrete neighbor.
    ///
    /// Probes and bootstrap messages are acted on only where the route
    /// stops, whether because it reached this node or found nowhere to go.
    pub fn is_dead_end(&self) -> bool {
        !matches!(self, NextHop::Peer(_))
    }

    pub fn peer(&self) -> Option<&Arc<Peer>> {
        match self {
            NextHop::Peer(peer) => Some(peer),
            _ => None,
        }
    }
}

/// Errors a protocol handler reports for a control message.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed control message: {0}")]
    Malformed(String),

    #[error("path conflict: {0}")]
    PathConflict(String),

    #[error("rejected: {0}")]
    Rejected(String),
}

/// Next-hop lookup against current routing state.
///
/// Implementations must not mutate routing state: the engine may resolve
/// the same frame more than once, and resolves synthesized replies with
/// the local peer as origin.
pub trait NextHopResolver: Send + Sync {
    fn resolve(&self, from: &Peer, frame: &Frame) -> NextHop;
}

/// Handlers for control messages that mutate shared routing state.
///
/// Called concurrently from every link's receive loop.
pub trait ProtocolHandlers: Send + Sync {
    /// Process a spanning tree announcement. Any onward propagation is the
    /// handler's own business.
    fn handle_tree_announcement(&self, from: &Peer, frame: &Frame) -> Result<(), HandlerError>;

    /// Process a bootstrap that has reached its key-space destination.
    fn handle_bootstrap(&self, from: &Peer, frame: &Frame) -> Result<(), HandlerError>;

    /// Process a bootstrap acknowledgement that has reached its destination.
    fn handle_bootstrap_ack(&self, from: &Peer, frame: &Frame) -> Result<(), HandlerError>;

    /// Accept or reject a path setup. `next_hop` is the hop the resolver
    /// chose for the setup frame.
    fn handle_setup(&self, from: &Peer, frame: &Frame, next_hop: &NextHop)
        -> Result<(), HandlerError>;

    /// Tear down a path segment and pick where the teardown goes next.
    ///
    /// [`NextHop::NoRoute`] ends the teardown here; [`NextHop::DeadEnd`]
    /// delivers it to the local node.
    fn handle_teardown(&self, from: &Peer, frame: &Frame) -> Result<NextHop, HandlerError>;

    /// This node's current tree coordinates.
    fn local_coordinates(&self) -> Coordinates;
}
