//! Per-frame forwarding decision.
//!
//! Every inbound frame gets a next hop resolved up front. The frame type
//! then decides whether a handler consumes it, whether a reply is built and
//! routed in its place, or whether it simply goes to the resolved hop.

use super::{ForwardError, HandlerError, NextHop, PingKey, Router};
use crate::coords::PortId;
use crate::peer::Peer;
use crate::protocol::{Frame, FrameType};
use tracing::trace;

impl Router {
    /// Decide what to do with one frame received from `from`.
    ///
    /// Consumes the frame, replaces it with a synthesized reply, or queues
    /// it on the next hop. Safe to call concurrently from every link.
    pub fn forward(&self, from: &Peer, frame: Frame) -> Result<(), ForwardError> {
        let port = from.port();
        let frame_type = frame.frame_type();
        let mut frame = frame;
        let mut next_hop = self.resolver.resolve(from, &frame);
        let dead_end = next_hop.is_dead_end();

        match frame_type {
            // Protocol messages
            FrameType::TreeAnnouncement => {
                return self
                    .handlers
                    .handle_tree_announcement(from, &frame)
                    .map_err(|e| handler_error(port, frame_type, "handle_tree_announcement", e));
            }

            FrameType::Keepalive => return Ok(()),

            FrameType::SnakeBootstrap => {
                if dead_end {
                    return self
                        .handlers
                        .handle_bootstrap(from, &frame)
                        .map_err(|e| handler_error(port, frame_type, "handle_bootstrap", e));
                }
            }

            FrameType::SnakeBootstrapAck => {
                if dead_end {
                    return self
                        .handlers
                        .handle_bootstrap_ack(from, &frame)
                        .map_err(|e| handler_error(port, frame_type, "handle_bootstrap_ack", e));
                }
            }

            FrameType::SnakeSetup => {
                return self
                    .handlers
                    .handle_setup(from, &frame, &next_hop)
                    .map_err(|e| handler_error(port, frame_type, "handle_setup", e));
            }

            FrameType::SnakeTeardown => {
                next_hop = self
                    .handlers
                    .handle_teardown(from, &frame)
                    .map_err(|e| handler_error(port, frame_type, "handle_teardown", e))?;
                if matches!(next_hop, NextHop::NoRoute) {
                    trace!(port, "Teardown reached its boundary");
                    return Ok(());
                }
            }

            // Traffic messages
            FrameType::SnakeTraffic | FrameType::GreedyTraffic | FrameType::SourceTraffic => {}

            FrameType::SnekPing => {
                let local_key = self.public_key();
                if frame.destination_key() == Some(&local_key)
                    && let Some(&source_key) = frame.source_key()
                {
                    trace!(port, from = %source_key.short(), "Answering identity ping");
                    frame = Frame::snek_pong(source_key, local_key);
                    next_hop = self.resolver.resolve(&self.local, &frame);
                }
            }

            FrameType::SnekPong => {
                let local_key = self.public_key();
                if frame.destination_key() == Some(&local_key)
                    && let Some(&source_key) = frame.source_key()
                {
                    let matched = self.pings.complete(&PingKey::Snek(source_key));
                    trace!(port, from = %source_key.short(), matched, "Identity pong received");
                    return Ok(());
                }
            }

            FrameType::TreePing => {
                if dead_end && let Some(source) = frame.source() {
                    trace!(port, from = %source, "Answering tree ping");
                    let pong = Frame::tree_pong(source.clone(), self.handlers.local_coordinates());
                    frame = pong;
                    next_hop = self.resolver.resolve(&self.local, &frame);
                }
            }

            FrameType::TreePong => {
                if dead_end && let Some(source) = frame.source() {
                    let matched = self.pings.complete(&PingKey::tree(source));
                    trace!(port, from = %source, matched, "Tree pong received");
                    return Ok(());
                }
            }
        }

        self.send_to(port, &next_hop, frame)
    }

    /// Queue `frame` on the resolved hop.
    ///
    /// A dead end hands the frame to the local-delivery peer.
    fn send_to(&self, port: PortId, next_hop: &NextHop, frame: Frame) -> Result<(), ForwardError> {
        let frame_type = frame.frame_type();
        let target = match next_hop {
            NextHop::Peer(peer) => peer,
            NextHop::DeadEnd => &self.local,
            NextHop::NoRoute => {
                return Err(ForwardError::NoRoute { port, frame_type });
            }
        };

        if !target.send(frame) {
            return Err(ForwardError::Dropped { port, frame_type });
        }

        trace!(port, next_port = target.port(), frame_type = %frame_type, "Forwarded frame");
        Ok(())
    }
}

fn handler_error(
    port: PortId,
    frame_type: FrameType,
    handler: &'static str,
    source: HandlerError,
) -> ForwardError {
    ForwardError::Handler {
        port,
        frame_type,
        handler,
        source,
    }
}
