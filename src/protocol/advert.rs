//! # Advert Records
//!
//! ADVERT payloads broadcast a node's identity and presence: a fixed
//! 100-byte prefix (public key, timestamp, signature) followed by a
//! flag-driven `app_data` tail.
//!
//! The tail is parsed best-effort for forward compatibility: an optional
//! field is read only when its flag bit is set AND enough bytes remain.
//! Insufficient trailing bytes silently omit the field, never error.

use bytes::Buf;
use serde::Serialize;

use crate::error::PacketError;

/// Ed25519 public key length.
pub const PUB_KEY_SIZE: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_SIZE: usize = 64;

/// Fixed prefix before `app_data`: key + timestamp + signature.
pub const FIXED_PREFIX_SIZE: usize = PUB_KEY_SIZE + 4 + SIGNATURE_SIZE;

const FLAG_HAS_LATLON: u8 = 0x10;
const FLAG_HAS_EXTRA1: u8 = 0x20;
const FLAG_HAS_EXTRA2: u8 = 0x40;
const FLAG_HAS_NAME: u8 = 0x80;

/// Node kind advertised in the low four flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvertKind {
    None,
    Chat,
    Repeater,
    Room,
    Sensor,
    Unknown(u8),
}

impl AdvertKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0 => AdvertKind::None,
            1 => AdvertKind::Chat,
            2 => AdvertKind::Repeater,
            3 => AdvertKind::Room,
            4 => AdvertKind::Sensor,
            other => AdvertKind::Unknown(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AdvertKind::None => "NONE",
            AdvertKind::Chat => "CHAT",
            AdvertKind::Repeater => "REPEATER",
            AdvertKind::Room => "ROOM",
            AdvertKind::Sensor => "SENSOR",
            AdvertKind::Unknown(_) => "UNKNOWN",
        }
    }
}

/// A decoded identity/presence broadcast. Built once per payload; immutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvertRecord {
    pub pub_key: [u8; PUB_KEY_SIZE],
    /// Unix seconds, little-endian on the wire.
    pub timestamp: u32,
    #[serde(with = "serde_signature")]
    pub signature: [u8; SIGNATURE_SIZE],
    /// Kind from the app_data flags byte; `None` kind when app_data absent.
    pub kind: AdvertKind,
    pub name: Option<String>,
    /// Degrees, from little-endian micro-degree i32.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub extra1: Option<u16>,
    pub extra2: Option<u16>,
}

impl AdvertRecord {
    /// Parse an ADVERT payload.
    ///
    /// # Errors
    /// [`PacketError::Truncated`] if the payload is shorter than the fixed
    /// prefix. The optional tail never errors.
    pub fn decode(payload: &[u8]) -> Result<Self, PacketError> {
        if payload.len() < FIXED_PREFIX_SIZE {
            return Err(PacketError::Truncated {
                field: "advert_prefix",
                needed: FIXED_PREFIX_SIZE - payload.len(),
            });
        }

        let mut buf = payload;
        let mut pub_key = [0u8; PUB_KEY_SIZE];
        buf.copy_to_slice(&mut pub_key);
        let timestamp = buf.get_u32_le();
        let mut signature = [0u8; SIGNATURE_SIZE];
        buf.copy_to_slice(&mut signature);

        let mut record = AdvertRecord {
            pub_key,
            timestamp,
            signature,
            kind: AdvertKind::None,
            name: None,
            lat: None,
            lon: None,
            extra1: None,
            extra2: None,
        };

        // app_data tail: flags byte, then flag-gated optional fields.
        if !buf.has_remaining() {
            return Ok(record);
        }
        let flags = buf.get_u8();
        record.kind = AdvertKind::from_bits(flags);

        if flags & FLAG_HAS_LATLON != 0 && buf.remaining() >= 8 {
            record.lat = Some(f64::from(buf.get_i32_le()) / 1e6);
            record.lon = Some(f64::from(buf.get_i32_le()) / 1e6);
        }
        if flags & FLAG_HAS_EXTRA1 != 0 && buf.remaining() >= 2 {
            record.extra1 = Some(buf.get_u16_le());
        }
        if flags & FLAG_HAS_EXTRA2 != 0 && buf.remaining() >= 2 {
            record.extra2 = Some(buf.get_u16_le());
        }
        if flags & FLAG_HAS_NAME != 0 && buf.has_remaining() {
            let name_bytes = match buf.iter().position(|&b| b == 0) {
                Some(nul) => &buf[..nul],
                None => buf,
            };
            if !name_bytes.is_empty() {
                record.name = Some(String::from_utf8_lossy(name_bytes).into_owned());
            }
        }

        Ok(record)
    }
}

/// Serde helper for the 64-byte signature array.
mod serde_signature {
    use serde::Serializer;

    pub fn serialize<S>(sig: &[u8; 64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(sig))
    }
}
