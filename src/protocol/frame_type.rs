//! Frame type tags and their addressing schemes.

use std::fmt;

/// Which addressing pair of a frame is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressScheme {
    /// Hop-by-hop control with no addressing; payload only.
    None,
    /// Tree coordinates (`source` / `destination`).
    Coordinates,
    /// Public keys (`source_key` / `destination_key`).
    Identity,
}

impl fmt::Display for AddressScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressScheme::None => "un",
            AddressScheme::Coordinates => "coordinate",
            AddressScheme::Identity => "identity",
        };
        write!(f, "{}", name)
    }
}

/// Wire-level frame type identifiers.
///
/// The set is closed: the forwarding engine matches on it exhaustively, so
/// adding a variant forces every dispatch site to handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    // Link control (0x00-0x0F)
    /// Link liveness filler; consumed on receipt.
    Keepalive = 0x00,
    /// Spanning tree parent/coordinate announcement.
    TreeAnnouncement = 0x01,

    // Virtual snake control (0x10-0x1F)
    /// Search for the key-space neighbor of the sender.
    SnakeBootstrap = 0x10,
    /// Reply to a bootstrap from the key-space neighbor.
    SnakeBootstrapAck = 0x11,
    /// Install a path segment along the route.
    SnakeSetup = 0x12,
    /// Remove a path segment along the route.
    SnakeTeardown = 0x13,

    // Traffic (0x20-0x2F)
    /// Traffic routed greedily by tree coordinates.
    GreedyTraffic = 0x20,
    /// Traffic following a sender-specified port path.
    SourceTraffic = 0x21,
    /// Traffic routed by public key over virtual snake paths.
    SnakeTraffic = 0x22,

    // Probes (0x30-0x3F)
    /// Identity-addressed reachability probe.
    SnekPing = 0x30,
    /// Reply to a `SnekPing`.
    SnekPong = 0x31,
    /// Coordinate-addressed reachability probe.
    TreePing = 0x32,
    /// Reply to a `TreePing`.
    TreePong = 0x33,
}

impl FrameType {
    /// Every frame type, in tag order.
    pub const ALL: [FrameType; 13] = [
        FrameType::Keepalive,
        FrameType::TreeAnnouncement,
        FrameType::SnakeBootstrap,
        FrameType::SnakeBootstrapAck,
        FrameType::SnakeSetup,
        FrameType::SnakeTeardown,
        FrameType::GreedyTraffic,
        FrameType::SourceTraffic,
        FrameType::SnakeTraffic,
        FrameType::SnekPing,
        FrameType::SnekPong,
        FrameType::TreePing,
        FrameType::TreePong,
    ];

    /// Try to convert from a byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(FrameType::Keepalive),
            0x01 => Some(FrameType::TreeAnnouncement),
            0x10 => Some(FrameType::SnakeBootstrap),
            0x11 => Some(FrameType::SnakeBootstrapAck),
            0x12 => Some(FrameType::SnakeSetup),
            0x13 => Some(FrameType::SnakeTeardown),
            0x20 => Some(FrameType::GreedyTraffic),
            0x21 => Some(FrameType::SourceTraffic),
            0x22 => Some(FrameType::SnakeTraffic),
            0x30 => Some(FrameType::SnekPing),
            0x31 => Some(FrameType::SnekPong),
            0x32 => Some(FrameType::TreePing),
            0x33 => Some(FrameType::TreePong),
            _ => None,
        }
    }

    /// Convert to a byte.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// The addressing pair this type carries.
    pub fn scheme(self) -> AddressScheme {
        match self {
            FrameType::Keepalive | FrameType::TreeAnnouncement => AddressScheme::None,
            FrameType::SnakeBootstrap
            | FrameType::SnakeBootstrapAck
            | FrameType::SnakeSetup
            | FrameType::SnakeTeardown
            | FrameType::SnakeTraffic
            | FrameType::SnekPing
            | FrameType::SnekPong => AddressScheme::Identity,
            FrameType::GreedyTraffic
            | FrameType::SourceTraffic
            | FrameType::TreePing
            | FrameType::TreePong => AddressScheme::Coordinates,
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameType::Keepalive => "Keepalive",
            FrameType::TreeAnnouncement => "TreeAnnouncement",
            FrameType::SnakeBootstrap => "SnakeBootstrap",
            FrameType::SnakeBootstrapAck => "SnakeBootstrapAck",
            FrameType::SnakeSetup => "SnakeSetup",
            FrameType::SnakeTeardown => "SnakeTeardown",
            FrameType::GreedyTraffic => "GreedyTraffic",
            FrameType::SourceTraffic => "SourceTraffic",
            FrameType::SnakeTraffic => "SnakeTraffic",
            FrameType::SnekPing => "SnekPing",
            FrameType::SnekPong => "SnekPong",
            FrameType::TreePing => "TreePing",
            FrameType::TreePong => "TreePong",
        };
        write!(f, "{}", name)
    }
}
