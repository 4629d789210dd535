//! Peer Links
//!
//! A [`Peer`] is one live link to a neighbor as seen by the forwarding
//! engine: a switch port, the neighbor's identity once known, and a bounded
//! outbound queue drained by the transport. Sending never blocks; a full or
//! closed queue drops the frame and reports `false`.
//!
//! The local node is modelled as a peer on port 0 whose queue is drained by
//! the application, so frames that terminate here are delivered the same way
//! frames to a neighbor are.

use crate::coords::PortId;
use crate::identity::PublicKey;
use crate::protocol::Frame;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::trace;

/// Port number reserved for the local node.
pub const LOCAL_PORT: PortId = 0;

/// Receiving half of a peer's outbound queue.
pub type PeerRx = mpsc::Receiver<Frame>;

/// Per-link frame counters.
#[derive(Debug, Default)]
pub struct PeerStats {
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl PeerStats {
    /// Frames accepted into the outbound queue.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    /// Frames refused because the queue was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// One link to a neighbor (or the local node on port 0).
pub struct Peer {
    port: PortId,
    public_key: Option<PublicKey>,
    tx: mpsc::Sender<Frame>,
    stats: PeerStats,
}

impl Peer {
    /// Create a peer link with an outbound queue of `queue_depth` frames.
    ///
    /// Returns the shared peer handle and the receiver the transport drains.
    pub fn new(
        port: PortId,
        public_key: Option<PublicKey>,
        queue_depth: usize,
    ) -> (Arc<Self>, PeerRx) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let peer = Arc::new(Self {
            port,
            public_key,
            tx,
            stats: PeerStats::default(),
        });
        (peer, rx)
    }

    /// Create the local-delivery peer for a node.
    pub fn local(public_key: PublicKey, queue_depth: usize) -> (Arc<Self>, PeerRx) {
        Self::new(LOCAL_PORT, Some(public_key), queue_depth)
    }

    pub fn port(&self) -> PortId {
        self.port
    }

    /// The neighbor's identity, if the link has learned it.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn is_local(&self) -> bool {
        self.port == LOCAL_PORT
    }

    /// Whether the receiving side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn stats(&self) -> &PeerStats {
        &self.stats
    }

    /// Queue a frame without waiting.
    ///
    /// Returns `false` if the queue is full or the link is closed; the frame
    /// is dropped in that case.
    pub fn send(&self, frame: Frame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => {
                self.stats.sent.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                let reason = match e {
                    mpsc::error::TrySendError::Full(_) => "queue full",
                    mpsc::error::TrySendError::Closed(_) => "link closed",
                };
                trace!(port = self.port, reason, "Peer send refused");
                false
            }
        }
    }
}

impl fmt::Debug for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Peer")
            .field("port", &self.port)
            .field("public_key", &self.public_key)
            .field("sent", &self.stats.sent())
            .field("dropped", &self.stats.dropped())
            .finish()
    }
}
