//! 32-byte public key used as a node's stable identity.

use secp256k1::XOnlyPublicKey;
use std::fmt;

use super::IdentityError;

/// Size of a serialized public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// A node's public key, serialized in x-only form.
///
/// Ordering is lexicographic over the raw bytes, which is the order the
/// virtual snake uses to position nodes in key-space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create a PublicKey from a 32-byte array.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a PublicKey from a slice.
    pub fn from_slice(slice: &[u8]) -> Result<Self, IdentityError> {
        let bytes: [u8; PUBLIC_KEY_SIZE] = slice
            .try_into()
            .map_err(|_| IdentityError::InvalidPublicKeyLength(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Derive the identity from an x-only secp256k1 public key.
    pub fn from_xonly(pubkey: &XOnlyPublicKey) -> Self {
        Self(pubkey.serialize())
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Short form for log lines (first 8 bytes, hex).
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.short())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
