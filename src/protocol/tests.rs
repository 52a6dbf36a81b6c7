// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::core::packet::{Packet, PayloadType, RouteType};
use crate::protocol::decoder::MeshDecoder;
use crate::protocol::payload::{PayloadBody, Sealed, UndecryptableReason};
use crate::utils::crypto::{mac_then_encrypt, SharedSecret};

const SECRET_HEX: &str = "cd95890fe082b80c6f2c2cd06d6fdf9b";

fn secret() -> SharedSecret {
    SharedSecret::from_hex(SECRET_HEX).expect("valid hex")
}

fn frame_for(route: RouteType, payload_type: PayloadType, payload: Vec<u8>) -> Vec<u8> {
    let packet = Packet::new(route, payload_type, Vec::new(), payload).expect("valid packet");
    MeshDecoder::new().encode_frame(&packet)
}

fn group_text_payload(channel_hash: u8, timestamp: u32, text: &str) -> Vec<u8> {
    let mut plaintext = timestamp.to_le_bytes().to_vec();
    plaintext.push(0x00); // plain-text sub-type
    plaintext.extend_from_slice(text.as_bytes());

    let mut payload = vec![channel_hash];
    payload.extend_from_slice(&mac_then_encrypt(&secret(), &plaintext));
    payload
}

fn peer_payload(plaintext: &[u8]) -> Vec<u8> {
    let mut payload = vec![0xD1, 0x51]; // dest hash, src hash
    payload.extend_from_slice(&mac_then_encrypt(&secret(), plaintext));
    payload
}

#[test]
fn group_text_end_to_end() {
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::GroupText,
        group_text_payload(0x42, 1_700_000_000, "alice: hello"),
    );

    let decoded = MeshDecoder::with_secret(secret())
        .decode_frame(&frame)
        .expect("decodes");

    match decoded.body {
        PayloadBody::GroupText {
            channel_hash,
            content: Sealed::Open(msg),
        } => {
            assert_eq!(channel_hash, 0x42);
            assert_eq!(msg.timestamp, 1_700_000_000);
            assert_eq!(msg.text.as_deref(), Some("alice: hello"));
        }
        other => panic!("expected open group text, got {other:?}"),
    }
}

#[test]
fn group_text_without_secret_is_undecryptable() {
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::GroupText,
        group_text_payload(0x42, 1, "hi"),
    );

    let decoded = MeshDecoder::new().decode_frame(&frame).expect("decodes");
    match decoded.body {
        PayloadBody::GroupText {
            channel_hash,
            content: Sealed::Undecryptable(UndecryptableReason::NoSecret),
        } => assert_eq!(channel_hash, 0x42),
        other => panic!("expected NoSecret outcome, got {other:?}"),
    }
}

#[test]
fn group_text_with_wrong_secret_fails_authentication() {
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::GroupText,
        group_text_payload(0x42, 1, "hi"),
    );

    let other_secret = SharedSecret::from_bytes(&[0x13; 32]);
    let decoded = MeshDecoder::with_secret(other_secret)
        .decode_frame(&frame)
        .expect("structure still decodes");
    match decoded.body {
        PayloadBody::GroupText {
            content: Sealed::Undecryptable(UndecryptableReason::AuthenticationFailed),
            ..
        } => {}
        other => panic!("expected auth failure, got {other:?}"),
    }
}

#[test]
fn group_payload_below_minimum_is_too_short() {
    let frame = frame_for(RouteType::Flood, PayloadType::GroupText, vec![0x42, 0x01]);
    let decoded = MeshDecoder::with_secret(secret())
        .decode_frame(&frame)
        .expect("decodes");
    match decoded.body {
        PayloadBody::GroupText {
            content: Sealed::Undecryptable(UndecryptableReason::TooShort),
            ..
        } => {}
        other => panic!("expected TooShort outcome, got {other:?}"),
    }
}

#[test]
fn group_data_plaintext_stays_raw() {
    let mut payload = vec![0x07];
    payload.extend_from_slice(&mac_then_encrypt(&secret(), b"binary blob"));
    let frame = frame_for(RouteType::Direct, PayloadType::GroupData, payload);

    let decoded = MeshDecoder::with_secret(secret())
        .decode_frame(&frame)
        .expect("decodes");
    match decoded.body {
        PayloadBody::GroupData {
            channel_hash,
            content: Sealed::Open(plaintext),
        } => {
            assert_eq!(channel_hash, 0x07);
            assert_eq!(plaintext, b"binary blob");
        }
        other => panic!("expected open group data, got {other:?}"),
    }
}

#[test]
fn direct_text_end_to_end() {
    let mut plaintext = 1_690_000_123u32.to_le_bytes().to_vec();
    plaintext.push(0x00);
    plaintext.extend_from_slice(b"see you at the repeater");

    let frame = frame_for(
        RouteType::Direct,
        PayloadType::TextMessage,
        peer_payload(&plaintext),
    );

    let decoded = MeshDecoder::with_secret(secret())
        .decode_frame(&frame)
        .expect("decodes");
    match decoded.body {
        PayloadBody::Text(Sealed::Open(msg)) => {
            assert_eq!(msg.timestamp, 1_690_000_123);
            assert_eq!(msg.text, "see you at the repeater");
        }
        other => panic!("expected open text, got {other:?}"),
    }
}

#[test]
fn request_and_response_carry_tags() {
    let mut plaintext = 0xCAFEF00Du32.to_le_bytes().to_vec();
    plaintext.extend_from_slice(&[0x01, 0x02, 0x03]);

    for (payload_type, want_request) in
        [(PayloadType::Request, true), (PayloadType::Response, false)]
    {
        let frame = frame_for(RouteType::Flood, payload_type, peer_payload(&plaintext));
        let decoded = MeshDecoder::with_secret(secret())
            .decode_frame(&frame)
            .expect("decodes");

        let sealed = match (want_request, decoded.body) {
            (true, PayloadBody::Request(sealed)) => sealed,
            (false, PayloadBody::Response(sealed)) => sealed,
            (_, other) => panic!("wrong body variant: {other:?}"),
        };
        let tagged = sealed.open().expect("open").clone();
        assert_eq!(tagged.tag, 0xCAFEF00D);
        assert_eq!(tagged.data, [0x01, 0x02, 0x03]);
    }
}

#[test]
fn path_update_stays_raw() {
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::Path,
        peer_payload(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE]),
    );
    let decoded = MeshDecoder::with_secret(secret())
        .decode_frame(&frame)
        .expect("decodes");
    match decoded.body {
        PayloadBody::PathUpdate(Sealed::Open(plaintext)) => {
            assert_eq!(plaintext, [0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);
        }
        other => panic!("expected open path update, got {other:?}"),
    }
}

#[test]
fn decrypted_but_unrecognized_shape_is_surfaced_raw() {
    // Three plaintext bytes cannot hold the timestamp + flags prefix.
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::TextMessage,
        peer_payload(b"abc"),
    );
    let decoded = MeshDecoder::with_secret(secret())
        .decode_frame(&frame)
        .expect("decodes");
    match decoded.body {
        PayloadBody::Text(Sealed::Unparsed(plaintext)) => assert_eq!(plaintext, b"abc"),
        other => panic!("expected unparsed outcome, got {other:?}"),
    }
}

#[test]
fn ack_crc_decodes_without_secret() {
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::Ack,
        0xDEADBEEFu32.to_le_bytes().to_vec(),
    );
    let decoded = MeshDecoder::new().decode_frame(&frame).expect("decodes");
    assert_eq!(
        decoded.body,
        PayloadBody::Ack {
            crc: Some(0xDEADBEEF)
        }
    );
}

#[test]
fn short_ack_has_no_crc() {
    let frame = frame_for(RouteType::Flood, PayloadType::Ack, vec![0x01, 0x02]);
    let decoded = MeshDecoder::new().decode_frame(&frame).expect("decodes");
    assert_eq!(decoded.body, PayloadBody::Ack { crc: None });
}

#[test]
fn control_payload_is_opaque() {
    let frame = frame_for(
        RouteType::Flood,
        PayloadType::Control,
        b"temperature:23.5:C".to_vec(),
    );
    let decoded = MeshDecoder::new().decode_frame(&frame).expect("decodes");
    match decoded.body {
        PayloadBody::Opaque { payload_type, data } => {
            assert_eq!(payload_type, PayloadType::Control);
            assert_eq!(data, b"temperature:23.5:C");
        }
        other => panic!("expected opaque body, got {other:?}"),
    }
}

#[test]
fn unknown_payload_type_is_reported_not_rejected() {
    // 0x0C is unassigned; header byte 0b00_1100_01 = FLOOD + type 0xC.
    let body = [0x31, 0x00, 0x99];
    let frame = crate::core::frame::wrap(&body);
    let decoded = MeshDecoder::new().decode_frame(&frame).expect("decodes");
    match decoded.body {
        PayloadBody::Unknown { code, data } => {
            assert_eq!(code, 0x0C);
            assert_eq!(data, [0x99]);
        }
        other => panic!("expected unknown body, got {other:?}"),
    }
}

#[test]
fn advert_end_to_end() {
    let mut payload = vec![0x5A; 32];
    payload.extend_from_slice(&1_700_000_000u32.to_le_bytes());
    payload.extend_from_slice(&[0x6B; 64]);
    payload.push(0x81); // CHAT with a name
    payload.extend_from_slice(b"garden-sensor\x00");

    let frame = frame_for(RouteType::Flood, PayloadType::Advert, payload);
    let decoded = MeshDecoder::new().decode_frame(&frame).expect("decodes");
    match decoded.body {
        PayloadBody::Advert(record) => {
            assert_eq!(record.pub_key, [0x5A; 32]);
            assert_eq!(record.name.as_deref(), Some("garden-sensor"));
        }
        other => panic!("expected advert, got {other:?}"),
    }
}

#[test]
fn decoder_from_config_roundtrip() {
    let config = crate::config::CodecConfig {
        secret_hex: Some(SECRET_HEX.to_string()),
    };
    let decoder = MeshDecoder::from_config(&config).expect("valid config");
    assert!(decoder.has_secret());

    let frame = frame_for(
        RouteType::Flood,
        PayloadType::GroupText,
        group_text_payload(0x01, 7, "cfg"),
    );
    let decoded = decoder.decode_frame(&frame).expect("decodes");
    match decoded.body {
        PayloadBody::GroupText {
            content: Sealed::Open(msg),
            ..
        } => assert_eq!(msg.text.as_deref(), Some("cfg")),
        other => panic!("expected open group text, got {other:?}"),
    }
}

#[test]
fn bad_frames_fail_independently() {
    // A corrupt frame must not poison the decoder for later messages.
    let decoder = MeshDecoder::with_secret(secret());

    assert!(decoder.decode_frame(&[0x00, 0x01]).is_err());

    let good = frame_for(RouteType::Flood, PayloadType::Ack, vec![0; 4]);
    assert!(decoder.decode_frame(&good).is_ok());
}
