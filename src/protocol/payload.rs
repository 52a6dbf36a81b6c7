//! # Payload Dispatch
//!
//! Per-payload-type interpretation of a packet's payload bytes, driven by a
//! closed enum so every assigned type is handled exhaustively at compile
//! time.
//!
//! Encrypted payload types never fail the decode pipeline: when a body
//! cannot be opened (no secret configured, bad MAC, malformed ciphertext)
//! the outcome is [`Sealed::Undecryptable`] with a reason, which is a
//! distinct result from a structurally malformed packet. A body that
//! decrypts but does not match its expected plaintext shape is surfaced raw
//! as [`Sealed::Unparsed`].

use serde::Serialize;

use crate::core::packet::{Packet, PayloadType};
use crate::error::{CryptoError, PacketError};
use crate::protocol::advert::AdvertRecord;
use crate::protocol::message::{ChannelMessage, DirectMessage, TaggedPayload};
use crate::utils::crypto::{mac_then_decrypt, SharedSecret};

/// Why an encrypted body could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UndecryptableReason {
    /// No shared secret is configured on the decoder.
    NoSecret,
    /// Payload too short to carry the hash prefix plus a MAC.
    TooShort,
    /// MAC verification failed (wrong secret or tampered data).
    AuthenticationFailed,
    /// Ciphertext not a whole number of cipher blocks.
    InvalidBlockLength,
}

impl From<CryptoError> for UndecryptableReason {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::TooShort => UndecryptableReason::TooShort,
            CryptoError::AuthenticationFailed => UndecryptableReason::AuthenticationFailed,
            CryptoError::InvalidBlockLength(_) => UndecryptableReason::InvalidBlockLength,
        }
    }
}

/// Outcome of an encrypted body: opened and parsed, opened but of an
/// unrecognized shape, or not openable at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Sealed<T> {
    Open(T),
    /// Decrypted successfully but the plaintext did not match the expected
    /// layout; the authenticated plaintext is still returned.
    Unparsed(Vec<u8>),
    Undecryptable(UndecryptableReason),
}

impl<T> Sealed<T> {
    pub fn is_open(&self) -> bool {
        matches!(self, Sealed::Open(_))
    }

    pub fn open(&self) -> Option<&T> {
        match self {
            Sealed::Open(value) => Some(value),
            _ => None,
        }
    }
}

/// Interpreted payload, one variant per assigned payload type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PayloadBody {
    /// REQ: encrypted tag + opaque request data.
    Request(Sealed<TaggedPayload>),
    /// RESPONSE: encrypted tag + opaque response data.
    Response(Sealed<TaggedPayload>),
    /// TXT_MSG: encrypted timestamp + flags + text.
    Text(Sealed<DirectMessage>),
    /// ACK: unencrypted; CRC present when the payload holds 4 bytes.
    Ack { crc: Option<u32> },
    /// ADVERT: identity/presence record.
    Advert(AdvertRecord),
    /// GRP_TXT: channel hash + encrypted channel message.
    GroupText {
        channel_hash: u8,
        content: Sealed<ChannelMessage>,
    },
    /// GRP_DATA: channel hash + encrypted opaque bytes.
    GroupData {
        channel_hash: u8,
        content: Sealed<Vec<u8>>,
    },
    /// PATH: encrypted routing update, kept opaque.
    PathUpdate(Sealed<Vec<u8>>),
    /// Types with no structural decode (CONTROL, RAW_CUSTOM, ANON_REQ,
    /// TRACE, MULTIPART).
    Opaque {
        payload_type: PayloadType,
        data: Vec<u8>,
    },
    /// Unassigned payload-type code; reported, never a failure.
    Unknown { code: u8, data: Vec<u8> },
}

/// Interpret a packet's payload according to its header type.
///
/// `secret` gates the encrypted types; `None` turns them all into
/// [`Sealed::Undecryptable`] outcomes rather than errors.
///
/// # Errors
/// Only [`PacketError::Truncated`] for an ADVERT shorter than its fixed
/// prefix; every other shape problem is tolerated by design.
pub fn decode_payload(
    packet: &Packet,
    secret: Option<&SharedSecret>,
) -> Result<PayloadBody, PacketError> {
    let payload = packet.payload.as_slice();

    let body = match packet.header.payload_type {
        PayloadType::Advert => PayloadBody::Advert(AdvertRecord::decode(payload)?),

        PayloadType::GroupText => {
            let (channel_hash, content) = decrypt_group(payload, secret);
            PayloadBody::GroupText {
                channel_hash,
                content: parse_open(content, ChannelMessage::decode),
            }
        }
        PayloadType::GroupData => {
            let (channel_hash, content) = decrypt_group(payload, secret);
            PayloadBody::GroupData {
                channel_hash,
                content: keep_raw(content),
            }
        }

        PayloadType::TextMessage => {
            PayloadBody::Text(parse_open(decrypt_peer(payload, secret), DirectMessage::decode))
        }
        PayloadType::Request => {
            PayloadBody::Request(parse_open(decrypt_peer(payload, secret), TaggedPayload::decode))
        }
        PayloadType::Response => {
            PayloadBody::Response(parse_open(decrypt_peer(payload, secret), TaggedPayload::decode))
        }
        PayloadType::Path => PayloadBody::PathUpdate(keep_raw(decrypt_peer(payload, secret))),

        PayloadType::Ack => PayloadBody::Ack {
            crc: payload
                .get(..4)
                .map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        },

        PayloadType::Control
        | PayloadType::RawCustom
        | PayloadType::AnonRequest
        | PayloadType::Trace
        | PayloadType::Multipart => PayloadBody::Opaque {
            payload_type: packet.header.payload_type,
            data: payload.to_vec(),
        },

        PayloadType::Unknown(code) => PayloadBody::Unknown {
            code,
            data: payload.to_vec(),
        },
    };

    Ok(body)
}

/// GRP_TXT / GRP_DATA: one channel-hash byte, then MAC + ciphertext.
/// The hash selects which group secret the sender used; it is reported but
/// not verified cryptographically here.
fn decrypt_group(
    payload: &[u8],
    secret: Option<&SharedSecret>,
) -> (u8, Result<Vec<u8>, UndecryptableReason>) {
    let channel_hash = payload.first().copied().unwrap_or(0);
    let content = match secret {
        None => Err(UndecryptableReason::NoSecret),
        Some(_) if payload.len() < 3 => Err(UndecryptableReason::TooShort),
        Some(secret) => mac_then_decrypt(secret, &payload[1..]).map_err(Into::into),
    };
    (channel_hash, content)
}

/// TXT_MSG / REQ / RESPONSE / PATH: one destination-hash byte and one
/// source-hash byte, then MAC + ciphertext.
fn decrypt_peer(
    payload: &[u8],
    secret: Option<&SharedSecret>,
) -> Result<Vec<u8>, UndecryptableReason> {
    match secret {
        None => Err(UndecryptableReason::NoSecret),
        Some(_) if payload.len() < 4 => Err(UndecryptableReason::TooShort),
        Some(secret) => mac_then_decrypt(secret, &payload[2..]).map_err(Into::into),
    }
}

fn parse_open<T>(
    content: Result<Vec<u8>, UndecryptableReason>,
    parse: impl FnOnce(&[u8]) -> Option<T>,
) -> Sealed<T> {
    match content {
        Ok(plaintext) => match parse(&plaintext) {
            Some(value) => Sealed::Open(value),
            None => Sealed::Unparsed(plaintext),
        },
        Err(reason) => Sealed::Undecryptable(reason),
    }
}

fn keep_raw(content: Result<Vec<u8>, UndecryptableReason>) -> Sealed<Vec<u8>> {
    match content {
        Ok(plaintext) => Sealed::Open(plaintext),
        Err(reason) => Sealed::Undecryptable(reason),
    }
}
