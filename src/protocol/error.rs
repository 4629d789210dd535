//! Protocol error types.

use thiserror::Error;

use super::{AddressScheme, FrameType};

/// Errors related to frame construction and wire encoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid frame type: 0x{0:02x}")]
    InvalidFrameType(u8),

    #[error("message too short: expected at least {expected}, got {got}")]
    MessageTooShort { expected: usize, got: usize },

    #[error("message too long: max {max}, got {got}")]
    MessageTooLong { max: usize, got: usize },

    #[error("unsupported frame version: {0}")]
    UnsupportedVersion(u8),

    #[error("frame type {frame_type} is {expected}-addressed")]
    SchemeMismatch {
        frame_type: FrameType,
        expected: AddressScheme,
    },

    #[error("malformed message: {0}")]
    Malformed(String),
}
