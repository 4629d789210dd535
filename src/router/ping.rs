//! Outstanding probe bookkeeping.
//!
//! A probe initiator registers its target and waits; the forwarding engine
//! completes the entry when the matching reply arrives. Entries live in a
//! sharded concurrent map and each holds a oneshot sender, so completing an
//! entry moves the sender out of the map under the shard lock before
//! signalling. Whichever of `complete` and the waiter's own release takes
//! the entry first is the only one that acts; the other finds nothing.

use crate::coords::Coordinates;
use crate::identity::PublicKey;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;

/// What a probe is addressed to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PingKey {
    /// Identity probe target.
    Snek(PublicKey),
    /// Coordinate probe target, in canonical string form.
    Tree(String),
}

impl PingKey {
    /// Key for a coordinate probe to `coords`.
    pub fn tree(coords: &Coordinates) -> Self {
        PingKey::Tree(coords.to_string())
    }
}

impl fmt::Display for PingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PingKey::Snek(key) => write!(f, "key {}", key.short()),
            PingKey::Tree(coords) => write!(f, "coords {}", coords),
        }
    }
}

/// Errors from probe registration and waiting.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("probe to {0} already pending")]
    AlreadyPending(PingKey),

    #[error("no next-hop found for probe to {0}")]
    NoRoute(PingKey),

    #[error("dropping probe to {0}")]
    Dropped(PingKey),

    #[error("probe to {key} timed out after {timeout:?}")]
    Timeout { key: PingKey, timeout: Duration },

    #[error("probe to {0} cancelled")]
    Cancelled(PingKey),
}

struct PendingPing {
    generation: u64,
    tx: oneshot::Sender<()>,
}

#[derive(Default)]
struct RegistryInner {
    pending: DashMap<PingKey, PendingPing>,
    next_generation: AtomicU64,
}

/// Concurrent map of outstanding probes.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct PingRegistry {
    inner: Arc<RegistryInner>,
}

impl PingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe to `key`.
    ///
    /// At most one probe per key may be outstanding.
    pub fn register(&self, key: PingKey) -> Result<PingWaiter, PingError> {
        match self.inner.pending.entry(key.clone()) {
            Entry::Occupied(_) => Err(PingError::AlreadyPending(key)),
            Entry::Vacant(slot) => {
                let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
                let (tx, rx) = oneshot::channel();
                slot.insert(PendingPing { generation, tx });
                Ok(PingWaiter {
                    registry: self.clone(),
                    key,
                    generation,
                    rx,
                })
            }
        }
    }

    /// Signal and remove the probe registered for `key`.
    ///
    /// Returns `false` if nothing is registered, including when the probe
    /// was already completed or its waiter gave up.
    pub fn complete(&self, key: &PingKey) -> bool {
        match self.inner.pending.remove(key) {
            Some((_, pending)) => {
                // The waiter may have been dropped between removal and now.
                let _ = pending.tx.send(());
                true
            }
            None => false,
        }
    }

    /// Drop every outstanding probe; their waiters resolve as cancelled.
    pub fn cancel_all(&self) {
        self.inner.pending.clear();
    }

    pub fn contains(&self, key: &PingKey) -> bool {
        self.inner.pending.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.pending.is_empty()
    }

    /// Remove `key` only if it still belongs to registration `generation`.
    ///
    /// Returns `true` if this call removed the entry.
    fn release(&self, key: &PingKey, generation: u64) -> bool {
        self.inner
            .pending
            .remove_if(key, |_, pending| pending.generation == generation)
            .is_some()
    }
}

impl fmt::Debug for PingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PingRegistry")
            .field("pending", &self.len())
            .finish()
    }
}

/// The initiator's side of a registered probe.
///
/// Dropping the waiter releases its registry entry, so a reply arriving
/// after the initiator gave up finds nothing to complete.
pub struct PingWaiter {
    registry: PingRegistry,
    key: PingKey,
    generation: u64,
    rx: oneshot::Receiver<()>,
}

impl PingWaiter {
    pub fn key(&self) -> &PingKey {
        &self.key
    }

    /// Wait up to `timeout` for the reply.
    ///
    /// When the deadline and a reply race, whichever removes the registry
    /// entry decides the outcome, so `complete` returns `true` exactly when
    /// this returns `Ok`.
    pub async fn wait(mut self, timeout: Duration) -> Result<(), PingError> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(PingError::Cancelled(self.key.clone())),
            Err(_) => {
                if self.registry.release(&self.key, self.generation) {
                    return Err(PingError::Timeout {
                        key: self.key.clone(),
                        timeout,
                    });
                }
                // A reply or cancel removed the entry first; its signal
                // follows the removal immediately.
                match (&mut self.rx).await {
                    Ok(()) => Ok(()),
                    Err(_) => Err(PingError::Cancelled(self.key.clone())),
                }
            }
        }
    }
}

impl Drop for PingWaiter {
    fn drop(&mut self) {
        self.registry.release(&self.key, self.generation);
    }
}

impl fmt::Debug for PingWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PingWaiter")
            .field("key", &self.key)
            .field("generation", &self.generation)
            .finish()
    }
}
