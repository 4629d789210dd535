//! Probe initiation.

use super::{NextHop, PingError, PingKey, Router};
use crate::coords::Coordinates;
use crate::identity::PublicKey;
use crate::protocol::Frame;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

impl Router {
    /// Probe a node by public key and return the round-trip time.
    ///
    /// The reply is routed back over the virtual snake and matched by the
    /// forwarding engine on its source key.
    pub async fn snek_ping(&self, target: PublicKey) -> Result<Duration, PingError> {
        let frame = Frame::snek_ping(target, self.public_key());
        self.probe(PingKey::Snek(target), frame).await
    }

    /// Probe a tree position and return the round-trip time.
    ///
    /// The reply comes from whichever node the ping dead-ends at, so this
    /// measures reachability of the coordinates rather than of one node.
    pub async fn tree_ping(&self, target: Coordinates) -> Result<Duration, PingError> {
        let key = PingKey::tree(&target);
        let frame = Frame::tree_ping(target, self.handlers.local_coordinates());
        self.probe(key, frame).await
    }

    async fn probe(&self, key: PingKey, frame: Frame) -> Result<Duration, PingError> {
        let waiter = self.pings.register(key.clone())?;
        let started = Instant::now();

        match self.resolver.resolve(&self.local, &frame) {
            NextHop::Peer(peer) => {
                if !peer.send(frame) {
                    debug!(probe = %key, port = peer.port(), "Probe dropped on send");
                    return Err(PingError::Dropped(key));
                }
            }
            NextHop::NoRoute | NextHop::DeadEnd => {
                debug!(probe = %key, "No next-hop for probe");
                return Err(PingError::NoRoute(key));
            }
        }

        let timeout = self.config.router.ping.timeout();
        match waiter.wait(timeout).await {
            Ok(()) => {
                let rtt = started.elapsed();
                debug!(probe = %key, rtt_ms = rtt.as_millis() as u64, "Probe answered");
                Ok(rtt)
            }
            Err(e) => {
                debug!(probe = %key, error = %e, "Probe failed");
                Err(e)
            }
        }
    }
}
