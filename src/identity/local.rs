//! Local node identity.

use rand::RngCore;
use secp256k1::{Keypair, Secp256k1, SecretKey};
use std::fmt;

use super::encoding::decode_secret;
use super::{IdentityError, PublicKey};

/// The local node's keypair and derived public identity.
pub struct Identity {
    keypair: Keypair,
    public_key: PublicKey,
}

impl Identity {
    /// Create a new random identity.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        loop {
            let mut secret_bytes = [0u8; 32];
            rng.fill_bytes(&mut secret_bytes);
            // All-zero or out-of-range scalars are astronomically unlikely; draw again.
            if let Ok(secret_key) = SecretKey::from_slice(&secret_bytes) {
                return Self::from_secret_key(secret_key);
            }
        }
    }

    /// Create an identity from an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        let (xonly, _parity) = keypair.x_only_public_key();
        Self {
            keypair,
            public_key: PublicKey::from_xonly(&xonly),
        }
    }

    /// Create an identity from a secret key.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let keypair = Keypair::from_secret_key(&secp, &secret_key);
        Self::from_keypair(keypair)
    }

    /// Create an identity from a hex-encoded secret key.
    pub fn from_secret_str(s: &str) -> Result<Self, IdentityError> {
        let secret_key = decode_secret(s)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Return the public identity of this node.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Return the secret key as lowercase hex.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.keypair.secret_bytes())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
