//! Unsigned LEB128 varints for switch port numbers.

use super::ProtocolError;

/// Longest encoding of a u64.
pub const MAX_UVARINT_LEN: usize = 10;

/// Append `value` as an unsigned varint.
pub fn encode_uvarint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Decode one unsigned varint, returning the value and bytes consumed.
///
/// Only the shortest encoding of a value is accepted.
pub fn decode_uvarint(data: &[u8]) -> Result<(u64, usize), ProtocolError> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate().take(MAX_UVARINT_LEN) {
        let bits = u64::from(byte & 0x7f);
        if i == MAX_UVARINT_LEN - 1 && byte > 0x01 {
            return Err(ProtocolError::Malformed("varint overflows u64".into()));
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(ProtocolError::Malformed("overlong varint".into()));
            }
            return Ok((value, i + 1));
        }
    }
    Err(ProtocolError::Malformed("truncated varint".into()))
}
