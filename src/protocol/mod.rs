//! Frame & Address Model
//!
//! Every message on a link is a [`Frame`]. Its [`FrameType`] tag fixes which
//! of two addressing namespaces is authoritative:
//!
//! - **Tree coordinates** for greedy, source-routed and tree-probe frames.
//! - **Public keys** for virtual-snake control, snake traffic and snek probes.
//!
//! Tree announcements and keepalives are hop-by-hop and carry payload only.

mod error;
mod frame;
mod frame_type;
mod varint;

pub use error::ProtocolError;
pub use frame::{Frame, FRAME_HEADER_SIZE, FRAME_VERSION, MAX_PAYLOAD_SIZE};
pub use frame_type::{AddressScheme, FrameType};
pub use varint::{decode_uvarint, encode_uvarint, MAX_UVARINT_LEN};

#[cfg(test)]
mod tests;
