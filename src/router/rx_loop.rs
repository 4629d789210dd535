//! Per-link receive loop.

use super::Router;
use crate::peer::Peer;
use crate::protocol::Frame;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

impl Router {
    /// Run the receive loop for one link.
    ///
    /// Decodes each buffer the transport delivers and forwards it in
    /// arrival order. Malformed buffers and forwarding errors are logged
    /// and skipped; neither ends the loop. Returns when the transport
    /// closes the channel.
    ///
    /// Spawn one of these per link; links run concurrently while each
    /// link's own frames stay in order.
    pub async fn run_link(self: Arc<Self>, peer: Arc<Peer>, mut rx: mpsc::Receiver<Vec<u8>>) {
        let port = peer.port();
        debug!(port, "Link receive loop started");

        while let Some(data) = rx.recv().await {
            let frame = match Frame::decode(&data) {
                Ok(frame) => frame,
                Err(e) => {
                    debug!(port, len = data.len(), error = %e, "Malformed frame, dropping");
                    continue;
                }
            };

            if let Err(e) = self.forward(&peer, frame) {
                debug!(port, error = %e, "Forwarding failed");
            }
        }

        debug!(port, "Link receive loop stopped (channel closed)");
    }
}
