//! Spanning Tree Coordinates
//!
//! A node's position in the spanning tree, written as the sequence of switch
//! ports taken from the root down to the node. Greedy routing compares these
//! paths: the tree distance between two nodes is the number of hops up to
//! their lowest common ancestor and back down.

use std::fmt;

/// Identifier of a switch port on a node. Port 0 is the local node itself.
pub type PortId = u64;

/// A node's coordinates in the spanning tree.
///
/// The path runs root-first: `[port at root, port at next hop, ...]`. The
/// root's own coordinates are empty.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Coordinates(Vec<PortId>);

impl Coordinates {
    /// Create coordinates from a root-first port path.
    pub fn new(ports: Vec<PortId>) -> Self {
        Self(ports)
    }

    /// Coordinates of the tree root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Coordinates of the child reached through `port` from this node.
    pub fn child(&self, port: PortId) -> Self {
        let mut ports = Vec::with_capacity(self.0.len() + 1);
        ports.extend_from_slice(&self.0);
        ports.push(port);
        Self(ports)
    }

    /// The root-first port path.
    pub fn ports(&self) -> &[PortId] {
        &self.0
    }

    /// Depth in the tree (0 = root).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leading ports shared with `other`.
    ///
    /// This is the depth of the lowest common ancestor.
    pub fn common_prefix_len(&self, other: &Coordinates) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Tree distance in hops through the lowest common ancestor.
    pub fn distance_to(&self, other: &Coordinates) -> usize {
        let common = self.common_prefix_len(other);
        (self.depth() - common) + (other.depth() - common)
    }

    /// Check whether `other` lies on the path from the root to this node.
    pub fn has_ancestor(&self, other: &Coordinates) -> bool {
        other.depth() < self.depth() && self.0.starts_with(&other.0)
    }
}

/// Canonical form: `[1 2 3]`, or `[]` for the root.
///
/// Probe bookkeeping keys coordinate pings on this string, so it must stay
/// stable and unambiguous.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, port) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", port)?;
        }
        write!(f, "]")
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates{}", self)
    }
}

impl From<Vec<PortId>> for Coordinates {
    fn from(ports: Vec<PortId>) -> Self {
        Self(ports)
    }
}

impl AsRef<[PortId]> for Coordinates {
    fn as_ref(&self) -> &[PortId] {
        &self.0
    }
}
