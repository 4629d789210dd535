//! Secret key text encoding.

use secp256k1::SecretKey;

use super::IdentityError;

/// Decode a hex-encoded 32-byte secret key.
///
/// Surrounding whitespace is ignored so values pasted into YAML with a
/// trailing newline still load.
pub fn decode_secret(s: &str) -> Result<SecretKey, IdentityError> {
    let bytes = hex::decode(s.trim())?;
    if bytes.len() != 32 {
        return Err(IdentityError::InvalidSecretLength(bytes.len()));
    }
    let secret_key = SecretKey::from_slice(&bytes)?;
    Ok(secret_key)
}
