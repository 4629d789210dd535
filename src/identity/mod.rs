//! Node Identity
//!
//! Each node is identified by a secp256k1 keypair. The 32-byte x-only public
//! key is the stable identity used by virtual-snake addressing and probe
//! replies; it never changes for the lifetime of the process.

mod encoding;
mod local;
mod public_key;

use thiserror::Error;

pub use encoding::decode_secret;
pub use local::Identity;
pub use public_key::{PublicKey, PUBLIC_KEY_SIZE};

/// Errors that can occur in identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(#[from] secp256k1::Error),

    #[error("invalid public key length: expected 32, got {0}")]
    InvalidPublicKeyLength(usize),

    #[error("invalid secret key length: expected 32, got {0}")]
    InvalidSecretLength(usize),

    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
