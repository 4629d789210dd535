//! meshroute: forwarding core for a self-organizing overlay mesh router.
//!
//! A node sits on point-to-point links to its neighbors and decides, for
//! every inbound frame, whether to consume it, answer it, or pass it on.
//! Two addressing schemes share the wire: spanning-tree coordinates for
//! greedy routing and public keys for the virtual snake.

pub mod config;
pub mod coords;
pub mod identity;
pub mod peer;
pub mod protocol;
pub mod router;

// Re-export identity types
pub use identity::{Identity, IdentityError, PublicKey};

// Re-export config types
pub use config::{Config, ConfigError, RouterConfig};

// Re-export coordinate types
pub use coords::{Coordinates, PortId};

// Re-export protocol types
pub use protocol::{AddressScheme, Frame, FrameType, ProtocolError};

// Re-export peer types
pub use peer::{Peer, PeerRx, PeerStats, LOCAL_PORT};

// Re-export router types
pub use router::{
    ForwardError, HandlerError, NextHop, NextHopResolver, PingError, PingKey, PingRegistry,
    PingWaiter, ProtocolHandlers, Router, RouterError,
};
