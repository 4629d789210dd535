use super::*;
use crate::coords::Coordinates;
use crate::identity::PublicKey;

fn make_key(val: u8) -> PublicKey {
    let mut bytes = [0u8; 32];
    bytes[0] = val;
    PublicKey::from_bytes(bytes)
}

fn make_coords(ports: &[u64]) -> Coordinates {
    Coordinates::new(ports.to_vec())
}

// ===== FrameType =====

#[test]
fn test_frame_type_byte_roundtrip() {
    for frame_type in FrameType::ALL {
        assert_eq!(FrameType::from_byte(frame_type.to_byte()), Some(frame_type));
    }
    assert_eq!(FrameType::from_byte(0xFF), None);
}

#[test]
fn test_frame_type_schemes() {
    assert_eq!(FrameType::Keepalive.scheme(), AddressScheme::None);
    assert_eq!(FrameType::TreeAnnouncement.scheme(), AddressScheme::None);
    assert_eq!(FrameType::SnakeSetup.scheme(), AddressScheme::Identity);
    assert_eq!(FrameType::SnekPong.scheme(), AddressScheme::Identity);
    assert_eq!(FrameType::GreedyTraffic.scheme(), AddressScheme::Coordinates);
    assert_eq!(FrameType::SourceTraffic.scheme(), AddressScheme::Coordinates);
    assert_eq!(FrameType::TreePing.scheme(), AddressScheme::Coordinates);
}

// ===== Construction =====

#[test]
fn test_keyed_rejects_coordinate_type() {
    let result = Frame::keyed(FrameType::GreedyTraffic, make_key(1), make_key(2), vec![]);
    assert!(matches!(
        result,
        Err(ProtocolError::SchemeMismatch {
            frame_type: FrameType::GreedyTraffic,
            expected: AddressScheme::Coordinates,
        })
    ));
}

#[test]
fn test_routed_rejects_identity_type() {
    let result = Frame::routed(
        FrameType::SnakeTraffic,
        make_coords(&[1]),
        make_coords(&[2]),
        vec![],
    );
    assert!(matches!(result, Err(ProtocolError::SchemeMismatch { .. })));
}

#[test]
fn test_control_rejects_addressed_type() {
    let result = Frame::control(FrameType::SnekPing, vec![]);
    assert!(matches!(result, Err(ProtocolError::SchemeMismatch { .. })));
}

#[test]
fn test_addressing_pairs_never_cross() {
    let keyed = Frame::snek_ping(make_key(1), make_key(2));
    assert_eq!(keyed.destination_key(), Some(&make_key(1)));
    assert_eq!(keyed.source_key(), Some(&make_key(2)));
    assert!(keyed.destination().is_none());
    assert!(keyed.source().is_none());

    let routed = Frame::tree_ping(make_coords(&[1, 2]), make_coords(&[3]));
    assert_eq!(routed.destination(), Some(&make_coords(&[1, 2])));
    assert_eq!(routed.source(), Some(&make_coords(&[3])));
    assert!(routed.destination_key().is_none());
    assert!(routed.source_key().is_none());

    let control = Frame::keepalive();
    assert!(control.destination().is_none());
    assert!(control.destination_key().is_none());
}

// ===== Wire Format =====

#[test]
fn test_keepalive_encoding() {
    let encoded = Frame::keepalive().encode().unwrap();
    assert_eq!(encoded, vec![FRAME_VERSION, 0x00, 0x00, 0x00]);
}

#[test]
fn test_tree_announcement_roundtrip() {
    let frame = Frame::tree_announcement(vec![9, 8, 7]);
    let encoded = frame.encode().unwrap();
    assert_eq!(encoded.len(), FRAME_HEADER_SIZE + 3);
    assert_eq!(Frame::decode(&encoded).unwrap(), frame);
}

#[test]
fn test_identity_frame_layout() {
    let frame = Frame::keyed(FrameType::SnakeTraffic, make_key(0xAA), make_key(0xBB), vec![1, 2])
        .unwrap();
    let encoded = frame.encode().unwrap();

    assert_eq!(encoded.len(), FRAME_HEADER_SIZE + 64 + 2);
    assert_eq!(encoded[1], FrameType::SnakeTraffic.to_byte());
    assert_eq!(&encoded[2..4], &[0x00, 0x02]);
    assert_eq!(encoded[4], 0xAA);
    assert_eq!(encoded[36], 0xBB);
    assert_eq!(&encoded[68..], &[1, 2]);

    assert_eq!(Frame::decode(&encoded).unwrap(), frame);
}

#[test]
fn test_coordinate_frame_roundtrip_with_large_ports() {
    let frame = Frame::routed(
        FrameType::GreedyTraffic,
        make_coords(&[1, 300, u64::MAX]),
        Coordinates::root(),
        b"hello".to_vec(),
    )
    .unwrap();
    let encoded = frame.encode().unwrap();
    let decoded = Frame::decode(&encoded).unwrap();

    assert_eq!(decoded.destination(), Some(&make_coords(&[1, 300, u64::MAX])));
    assert_eq!(decoded.source(), Some(&Coordinates::root()));
    assert_eq!(decoded.payload(), b"hello");
}

#[test]
fn test_decode_too_short() {
    let result = Frame::decode(&[0x00, 0x00]);
    assert!(matches!(
        result,
        Err(ProtocolError::MessageTooShort { expected: 4, got: 2 })
    ));
}

#[test]
fn test_decode_bad_version() {
    let result = Frame::decode(&[0x07, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(ProtocolError::UnsupportedVersion(7))));
}

#[test]
fn test_decode_unknown_type() {
    let result = Frame::decode(&[FRAME_VERSION, 0x7E, 0x00, 0x00]);
    assert!(matches!(result, Err(ProtocolError::InvalidFrameType(0x7E))));
}

#[test]
fn test_decode_truncated_keys() {
    let frame = Frame::snek_pong(make_key(1), make_key(2));
    let encoded = frame.encode().unwrap();
    let result = Frame::decode(&encoded[..40]);
    assert!(matches!(result, Err(ProtocolError::MessageTooShort { .. })));
}

#[test]
fn test_decode_truncated_payload() {
    let frame = Frame::tree_announcement(vec![1, 2, 3, 4]);
    let encoded = frame.encode().unwrap();
    let result = Frame::decode(&encoded[..encoded.len() - 1]);
    assert!(matches!(result, Err(ProtocolError::MessageTooShort { .. })));
}

#[test]
fn test_decode_trailing_bytes() {
    let mut encoded = Frame::keepalive().encode().unwrap();
    encoded.push(0xFF);
    let result = Frame::decode(&encoded);
    assert!(matches!(result, Err(ProtocolError::Malformed(_))));
}

#[test]
fn test_decode_coordinate_length_past_end() {
    // destination claims 10 bytes of ports but only 1 follows
    let data = [FRAME_VERSION, FrameType::TreePing.to_byte(), 0x00, 0x00, 0x00, 0x0A, 0x01];
    let result = Frame::decode(&data);
    assert!(matches!(result, Err(ProtocolError::MessageTooShort { .. })));
}

#[test]
fn test_decode_truncated_varint_in_coordinates() {
    // one-byte coordinate field holding an unterminated varint
    let data = [
        FRAME_VERSION,
        FrameType::TreePing.to_byte(),
        0x00,
        0x00,
        0x00,
        0x01,
        0x80,
        0x00,
        0x00,
    ];
    let result = Frame::decode(&data);
    assert!(matches!(result, Err(ProtocolError::Malformed(_))));
}

#[test]
fn test_encode_rejects_oversized_payload() {
    let frame = Frame::tree_announcement(vec![0u8; MAX_PAYLOAD_SIZE + 1]);
    assert!(matches!(
        frame.encode(),
        Err(ProtocolError::MessageTooLong { .. })
    ));
}

// ===== Varints =====

#[test]
fn test_uvarint_boundaries() {
    for value in [0u64, 1, 127, 128, 16_383, 16_384, u64::MAX] {
        let mut buf = Vec::new();
        encode_uvarint(&mut buf, value);
        assert!(buf.len() <= MAX_UVARINT_LEN);
        assert_eq!(decode_uvarint(&buf).unwrap(), (value, buf.len()));
    }
}

#[test]
fn test_uvarint_overflow_rejected() {
    let data = [0xFF; 11];
    assert!(matches!(decode_uvarint(&data), Err(ProtocolError::Malformed(_))));
}

#[test]
fn test_uvarint_overlong_rejected() {
    assert!(matches!(decode_uvarint(&[0x80, 0x00]), Err(ProtocolError::Malformed(_))));
    assert!(matches!(
        decode_uvarint(&[0xFF, 0x80, 0x00]),
        Err(ProtocolError::Malformed(_))
    ));
    // A lone zero byte is the canonical encoding of 0.
    assert_eq!(decode_uvarint(&[0x00]).unwrap(), (0, 1));
}

#[test]
fn test_decode_rejects_overlong_port_in_coordinates() {
    let frame = Frame::tree_ping(Coordinates::new(vec![5]), Coordinates::root());
    let mut data = frame.encode().unwrap();
    // destination: [len=1][0x05] -> [len=2][0x85 0x00]
    let at = FRAME_HEADER_SIZE;
    assert_eq!(&data[at..at + 3], &[0x00, 0x01, 0x05]);
    data.splice(at..at + 3, [0x00, 0x02, 0x85, 0x00]);

    assert!(matches!(Frame::decode(&data), Err(ProtocolError::Malformed(_))));
}

#[test]
fn test_uvarint_empty_rejected() {
    assert!(matches!(decode_uvarint(&[]), Err(ProtocolError::Malformed(_))));
}
