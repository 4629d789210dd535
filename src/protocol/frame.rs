//! The frame: one routed message unit and its wire encoding.
//!
//! ## Wire Format
//!
//! ```text
//! [version:1][type:1][payload_len:2 BE] addressing payload
//! ```
//!
//! | Scheme      | Addressing                                           |
//! |-------------|------------------------------------------------------|
//! | none        | (empty)                                              |
//! | coordinates | destination, source: each `[len:2 BE][uvarint...]`   |
//! | identity    | destination_key (32), source_key (32)                |

use super::varint::{decode_uvarint, encode_uvarint};
use super::{AddressScheme, FrameType, ProtocolError};
use crate::coords::Coordinates;
use crate::identity::{PublicKey, PUBLIC_KEY_SIZE};

/// Current frame format version.
pub const FRAME_VERSION: u8 = 0;

/// Size of the fixed frame header.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Largest payload a single frame can carry.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// The load-bearing addressing pair of a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Addressing {
    None,
    Coordinates {
        destination: Coordinates,
        source: Coordinates,
    },
    Identity {
        destination_key: PublicKey,
        source_key: PublicKey,
    },
}

/// A routed message.
///
/// Frames are immutable once built. The constructors tie the addressing
/// pair to the frame type, so a coordinate-addressed frame has no keys to
/// read and vice versa.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    frame_type: FrameType,
    addressing: Addressing,
    payload: Vec<u8>,
}

impl Frame {
    /// Build a frame for a type that carries no addressing.
    pub fn control(frame_type: FrameType, payload: Vec<u8>) -> Result<Self, ProtocolError> {
        Self::check_scheme(frame_type, AddressScheme::None)?;
        Ok(Self {
            frame_type,
            addressing: Addressing::None,
            payload,
        })
    }

    /// Build an identity-addressed frame.
    pub fn keyed(
        frame_type: FrameType,
        destination_key: PublicKey,
        source_key: PublicKey,
        payload: Vec<u8>,
    ) -> Result<Self, ProtocolError> {
        Self::check_scheme(frame_type, AddressScheme::Identity)?;
        Ok(Self {
            frame_type,
            addressing: Addressing::Identity {
                destination_key,
                source_key,
            },
            payload,
        })
    }

    /// Build a coordinate-addressed frame.
    pub fn routed(
        frame_type: FrameType,
        destination: Coordinates,
        source: Coordinates,
        payload: Vec<u8>,
    ) -> Result<Self, ProtocolError> {
        Self::check_scheme(frame_type, AddressScheme::Coordinates)?;
        Ok(Self {
            frame_type,
            addressing: Addressing::Coordinates {
                destination,
                source,
            },
            payload,
        })
    }

    pub fn keepalive() -> Self {
        Self {
            frame_type: FrameType::Keepalive,
            addressing: Addressing::None,
            payload: Vec::new(),
        }
    }

    pub fn tree_announcement(payload: Vec<u8>) -> Self {
        Self {
            frame_type: FrameType::TreeAnnouncement,
            addressing: Addressing::None,
            payload,
        }
    }

    /// Identity probe from `source_key` toward `destination_key`.
    pub fn snek_ping(destination_key: PublicKey, source_key: PublicKey) -> Self {
        Self::probe(FrameType::SnekPing, destination_key, source_key)
    }

    /// Identity probe reply from `source_key` back to `destination_key`.
    pub fn snek_pong(destination_key: PublicKey, source_key: PublicKey) -> Self {
        Self::probe(FrameType::SnekPong, destination_key, source_key)
    }

    /// Coordinate probe from `source` toward `destination`.
    pub fn tree_ping(destination: Coordinates, source: Coordinates) -> Self {
        Self::tree_probe(FrameType::TreePing, destination, source)
    }

    /// Coordinate probe reply from `source` back to `destination`.
    pub fn tree_pong(destination: Coordinates, source: Coordinates) -> Self {
        Self::tree_probe(FrameType::TreePong, destination, source)
    }

    fn probe(frame_type: FrameType, destination_key: PublicKey, source_key: PublicKey) -> Self {
        Self {
            frame_type,
            addressing: Addressing::Identity {
                destination_key,
                source_key,
            },
            payload: Vec::new(),
        }
    }

    fn tree_probe(frame_type: FrameType, destination: Coordinates, source: Coordinates) -> Self {
        Self {
            frame_type,
            addressing: Addressing::Coordinates {
                destination,
                source,
            },
            payload: Vec::new(),
        }
    }

    fn check_scheme(frame_type: FrameType, requested: AddressScheme) -> Result<(), ProtocolError> {
        let expected = frame_type.scheme();
        if expected != requested {
            return Err(ProtocolError::SchemeMismatch {
                frame_type,
                expected,
            });
        }
        Ok(())
    }

    pub fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    /// Destination coordinates, for coordinate-addressed frames.
    pub fn destination(&self) -> Option<&Coordinates> {
        match &self.addressing {
            Addressing::Coordinates { destination, .. } => Some(destination),
            _ => None,
        }
    }

    /// Source coordinates, for coordinate-addressed frames.
    pub fn source(&self) -> Option<&Coordinates> {
        match &self.addressing {
            Addressing::Coordinates { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Destination key, for identity-addressed frames.
    pub fn destination_key(&self) -> Option<&PublicKey> {
        match &self.addressing {
            Addressing::Identity {
                destination_key, ..
            } => Some(destination_key),
            _ => None,
        }
    }

    /// Source key, for identity-addressed frames.
    pub fn source_key(&self) -> Option<&PublicKey> {
        match &self.addressing {
            Addressing::Identity { source_key, .. } => Some(source_key),
            _ => None,
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encode to wire format.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::MessageTooLong {
                max: MAX_PAYLOAD_SIZE,
                got: self.payload.len(),
            });
        }

        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + 2 * PUBLIC_KEY_SIZE + self.payload.len());
        buf.push(FRAME_VERSION);
        buf.push(self.frame_type.to_byte());
        buf.extend_from_slice(&(self.payload.len() as u16).to_be_bytes());

        match &self.addressing {
            Addressing::None => {}
            Addressing::Coordinates {
                destination,
                source,
            } => {
                encode_coordinates(&mut buf, destination)?;
                encode_coordinates(&mut buf, source)?;
            }
            Addressing::Identity {
                destination_key,
                source_key,
            } => {
                buf.extend_from_slice(destination_key.as_bytes());
                buf.extend_from_slice(source_key.as_bytes());
            }
        }

        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }

    /// Decode one complete frame from wire format.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(ProtocolError::MessageTooShort {
                expected: FRAME_HEADER_SIZE,
                got: data.len(),
            });
        }

        let version = data[0];
        if version != FRAME_VERSION {
            return Err(ProtocolError::UnsupportedVersion(version));
        }

        let frame_type =
            FrameType::from_byte(data[1]).ok_or(ProtocolError::InvalidFrameType(data[1]))?;
        let payload_len = u16::from_be_bytes([data[2], data[3]]) as usize;

        let mut pos = FRAME_HEADER_SIZE;
        let addressing = match frame_type.scheme() {
            AddressScheme::None => Addressing::None,
            AddressScheme::Coordinates => {
                let destination = decode_coordinates(data, &mut pos)?;
                let source = decode_coordinates(data, &mut pos)?;
                Addressing::Coordinates {
                    destination,
                    source,
                }
            }
            AddressScheme::Identity => {
                let destination_key = decode_key(data, &mut pos)?;
                let source_key = decode_key(data, &mut pos)?;
                Addressing::Identity {
                    destination_key,
                    source_key,
                }
            }
        };

        let remaining = data.len() - pos;
        if remaining < payload_len {
            return Err(ProtocolError::MessageTooShort {
                expected: pos + payload_len,
                got: data.len(),
            });
        }
        if remaining > payload_len {
            return Err(ProtocolError::Malformed(format!(
                "{} trailing bytes after payload",
                remaining - payload_len
            )));
        }

        Ok(Self {
            frame_type,
            addressing,
            payload: data[pos..].to_vec(),
        })
    }
}

fn encode_coordinates(buf: &mut Vec<u8>, coords: &Coordinates) -> Result<(), ProtocolError> {
    let mut ports = Vec::with_capacity(coords.depth());
    for &port in coords.ports() {
        encode_uvarint(&mut ports, port);
    }
    if ports.len() > u16::MAX as usize {
        return Err(ProtocolError::MessageTooLong {
            max: u16::MAX as usize,
            got: ports.len(),
        });
    }
    buf.extend_from_slice(&(ports.len() as u16).to_be_bytes());
    buf.extend_from_slice(&ports);
    Ok(())
}

fn decode_coordinates(data: &[u8], pos: &mut usize) -> Result<Coordinates, ProtocolError> {
    if data.len() < *pos + 2 {
        return Err(ProtocolError::MessageTooShort {
            expected: *pos + 2,
            got: data.len(),
        });
    }
    let len = u16::from_be_bytes([data[*pos], data[*pos + 1]]) as usize;
    *pos += 2;

    let end = *pos + len;
    if data.len() < end {
        return Err(ProtocolError::MessageTooShort {
            expected: end,
            got: data.len(),
        });
    }

    let mut ports = Vec::new();
    let mut cursor = *pos;
    while cursor < end {
        let (port, used) = decode_uvarint(&data[cursor..end])?;
        ports.push(port);
        cursor += used;
    }
    *pos = end;
    Ok(Coordinates::new(ports))
}

fn decode_key(data: &[u8], pos: &mut usize) -> Result<PublicKey, ProtocolError> {
    let end = *pos + PUBLIC_KEY_SIZE;
    if data.len() < end {
        return Err(ProtocolError::MessageTooShort {
            expected: end,
            got: data.len(),
        });
    }
    let key = PublicKey::from_slice(&data[*pos..end])
        .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    *pos = end;
    Ok(key)
}
