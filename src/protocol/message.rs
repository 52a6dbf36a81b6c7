//! Plaintext shapes recovered from decrypted message bodies.
//!
//! These parsers run on the output of
//! [`mac_then_decrypt`](crate::utils::crypto::mac_then_decrypt) and are
//! intentionally forgiving: a plaintext that does not match the expected
//! shape is returned to the caller raw rather than rejected, because a
//! successfully authenticated body is still worth surfacing.

use bytes::Buf;
use serde::Serialize;

/// Sub-type carried in bits 2-7 of a channel message's flags byte.
/// Only plain text (0) has a decoded form.
pub const CHANNEL_TEXT_PLAIN: u8 = 0;

/// A decrypted GRP_TXT body: timestamp, flags, and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelMessage {
    /// Unix seconds, little-endian on the wire.
    pub timestamp: u32,
    pub flags: u8,
    /// UTF-8 tail, decoded only for the plain-text sub-type.
    pub text: Option<String>,
}

impl ChannelMessage {
    /// Parse a decrypted group body. `None` if shorter than the 5-byte
    /// timestamp + flags prefix.
    pub fn decode(plaintext: &[u8]) -> Option<Self> {
        if plaintext.len() < 5 {
            return None;
        }
        let mut buf = plaintext;
        let timestamp = buf.get_u32_le();
        let flags = buf.get_u8();
        let text = if (flags >> 2) & 0x3F == CHANNEL_TEXT_PLAIN {
            Some(String::from_utf8_lossy(buf).into_owned())
        } else {
            None
        };
        Some(ChannelMessage {
            timestamp,
            flags,
            text,
        })
    }

    /// Sub-type bits 2-7 of the flags byte.
    pub fn sub_type(&self) -> u8 {
        (self.flags >> 2) & 0x3F
    }
}

/// A decrypted TXT_MSG body: timestamp, flags, and NUL-stripped text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectMessage {
    pub timestamp: u32,
    pub flags: u8,
    pub text: String,
}

impl DirectMessage {
    /// Parse a decrypted peer text body. `None` if shorter than the 5-byte
    /// prefix.
    pub fn decode(plaintext: &[u8]) -> Option<Self> {
        if plaintext.len() < 5 {
            return None;
        }
        let mut buf = plaintext;
        let timestamp = buf.get_u32_le();
        let flags = buf.get_u8();
        let text = String::from_utf8_lossy(buf)
            .trim_end_matches('\0')
            .to_string();
        Some(DirectMessage {
            timestamp,
            flags,
            text,
        })
    }
}

/// A decrypted REQ or RESPONSE body: a 4-byte tag plus opaque data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedPayload {
    /// Little-endian correlation tag.
    pub tag: u32,
    pub data: Vec<u8>,
}

impl TaggedPayload {
    /// Parse a decrypted request/response body. `None` if shorter than the
    /// 4-byte tag.
    pub fn decode(plaintext: &[u8]) -> Option<Self> {
        if plaintext.len() < 4 {
            return None;
        }
        let mut buf = plaintext;
        let tag = buf.get_u32_le();
        Some(TaggedPayload {
            tag,
            data: buf.to_vec(),
        })
    }
}
