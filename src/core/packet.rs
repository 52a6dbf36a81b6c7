//! # Packet Layout
//!
//! The structured record carried inside a frame body:
//!
//! ```text
//! [Header(1)] [Transport codes(0 or 4)] [PathLen(1)] [Path(N)] [Payload(...)]
//! ```
//!
//! The header byte packs `route_type` into bits 0-1 and `payload_type` into
//! bits 2-5. Bits 6-7 are ambiguous upstream: the protocol reads them as a
//! two-bit "payload version" while also testing bit 7 alone as the
//! has-transport flag. Both derived values are preserved on decode and
//! neither is reconciled here; which one is authoritative depends on the
//! payload type and is the caller's call.
//!
//! The encode path is deliberately asymmetric: it never re-emits the decoded
//! version bits. Transport codes are emitted (setting bit 7) only when the
//! optional field is present.

use bytes::Buf;
use serde::Serialize;

use crate::error::PacketError;

/// Route type, bits 0-1 of the header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteType {
    TransportFlood,
    Flood,
    Direct,
    TransportDirect,
}

impl RouteType {
    /// Decode from the low two header bits.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => RouteType::TransportFlood,
            0x01 => RouteType::Flood,
            0x02 => RouteType::Direct,
            _ => RouteType::TransportDirect,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            RouteType::TransportFlood => 0x00,
            RouteType::Flood => 0x01,
            RouteType::Direct => 0x02,
            RouteType::TransportDirect => 0x03,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RouteType::TransportFlood => "TRANSPORT_FLOOD",
            RouteType::Flood => "FLOOD",
            RouteType::Direct => "DIRECT",
            RouteType::TransportDirect => "TRANSPORT_DIRECT",
        }
    }
}

/// Payload type, bits 2-5 of the header byte.
///
/// Closed over every assigned code; unassigned codes decode to
/// [`PayloadType::Unknown`] and are reported rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PayloadType {
    Request,
    Response,
    TextMessage,
    Ack,
    Advert,
    GroupText,
    GroupData,
    AnonRequest,
    Path,
    Trace,
    Multipart,
    Control,
    RawCustom,
    Unknown(u8),
}

impl PayloadType {
    pub fn from_code(code: u8) -> Self {
        match code & 0x0F {
            0x00 => PayloadType::Request,
            0x01 => PayloadType::Response,
            0x02 => PayloadType::TextMessage,
            0x03 => PayloadType::Ack,
            0x04 => PayloadType::Advert,
            0x05 => PayloadType::GroupText,
            0x06 => PayloadType::GroupData,
            0x07 => PayloadType::AnonRequest,
            0x08 => PayloadType::Path,
            0x09 => PayloadType::Trace,
            0x0A => PayloadType::Multipart,
            0x0B => PayloadType::Control,
            0x0F => PayloadType::RawCustom,
            other => PayloadType::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            PayloadType::Request => 0x00,
            PayloadType::Response => 0x01,
            PayloadType::TextMessage => 0x02,
            PayloadType::Ack => 0x03,
            PayloadType::Advert => 0x04,
            PayloadType::GroupText => 0x05,
            PayloadType::GroupData => 0x06,
            PayloadType::AnonRequest => 0x07,
            PayloadType::Path => 0x08,
            PayloadType::Trace => 0x09,
            PayloadType::Multipart => 0x0A,
            PayloadType::Control => 0x0B,
            PayloadType::RawCustom => 0x0F,
            PayloadType::Unknown(code) => code & 0x0F,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PayloadType::Request => "REQ",
            PayloadType::Response => "RESPONSE",
            PayloadType::TextMessage => "TXT_MSG",
            PayloadType::Ack => "ACK",
            PayloadType::Advert => "ADVERT",
            PayloadType::GroupText => "GRP_TXT",
            PayloadType::GroupData => "GRP_DATA",
            PayloadType::AnonRequest => "ANON_REQ",
            PayloadType::Path => "PATH",
            PayloadType::Trace => "TRACE",
            PayloadType::Multipart => "MULTIPART",
            PayloadType::Control => "CONTROL",
            PayloadType::RawCustom => "RAW_CUSTOM",
            PayloadType::Unknown(_) => "UNKNOWN",
        }
    }
}

/// Decoded header byte with both readings of the ambiguous high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub route_type: RouteType,
    pub payload_type: PayloadType,
    /// Declared payload version, bits 6-7. Overlaps `has_transport`; see the
    /// module docs. Decode-only: never re-emitted by [`Packet::encode`].
    pub payload_version: u8,
    /// Bit 7 read as the has-transport flag.
    pub has_transport: bool,
}

impl Header {
    /// Decode the packed header byte.
    pub fn from_byte(byte: u8) -> Self {
        Header {
            route_type: RouteType::from_bits(byte & 0x03),
            payload_type: PayloadType::from_code((byte >> 2) & 0x0F),
            payload_version: (byte >> 6) & 0x03,
            has_transport: (byte & 0x80) != 0,
        }
    }
}

/// Maximum number of path entries encodable in the one-byte length prefix.
pub const MAX_PATH_LEN: usize = 255;

/// A parsed mesh packet. Constructed once per decode or send; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Packet {
    pub header: Header,
    /// Two little-endian u16 codes, present iff header bit 7 was set.
    pub transport_codes: Option<(u16, u16)>,
    /// Opaque hop identifiers, at most [`MAX_PATH_LEN`] entries.
    pub path: Vec<u8>,
    /// Raw payload bytes, interpreted per `header.payload_type`.
    pub payload: Vec<u8>,
}

impl Packet {
    /// Build an outbound packet without transport codes.
    ///
    /// # Errors
    /// [`PacketError::PathTooLong`] if `path` exceeds [`MAX_PATH_LEN`]
    /// entries; over-long paths are rejected here rather than silently
    /// truncated at encode time.
    pub fn new(
        route_type: RouteType,
        payload_type: PayloadType,
        path: Vec<u8>,
        payload: Vec<u8>,
    ) -> Result<Self, PacketError> {
        if path.len() > MAX_PATH_LEN {
            return Err(PacketError::PathTooLong(path.len()));
        }
        Ok(Packet {
            header: Header {
                route_type,
                payload_type,
                payload_version: 0,
                has_transport: false,
            },
            transport_codes: None,
            path,
            payload,
        })
    }

    /// Attach transport codes to an outbound packet. [`Packet::encode`] will
    /// set header bit 7 and emit the codes.
    pub fn with_transport_codes(mut self, codes: (u16, u16)) -> Self {
        self.transport_codes = Some(codes);
        self.header.has_transport = true;
        self
    }

    /// Parse a packet from a frame body.
    ///
    /// Each step is a hard boundary check; insufficient bytes fail
    /// [`PacketError::Truncated`] naming the field that ran short.
    pub fn decode(body: &[u8]) -> Result<Self, PacketError> {
        let mut buf = body;

        if !buf.has_remaining() {
            return Err(PacketError::EmptyBody);
        }
        let header = Header::from_byte(buf.get_u8());

        let transport_codes = if header.has_transport {
            if buf.remaining() < 4 {
                return Err(PacketError::Truncated {
                    field: "transport_codes",
                    needed: 4 - buf.remaining(),
                });
            }
            Some((buf.get_u16_le(), buf.get_u16_le()))
        } else {
            None
        };

        if !buf.has_remaining() {
            return Err(PacketError::Truncated {
                field: "path_len",
                needed: 1,
            });
        }
        let path_len = usize::from(buf.get_u8());

        if buf.remaining() < path_len {
            return Err(PacketError::Truncated {
                field: "path",
                needed: path_len - buf.remaining(),
            });
        }
        let path = buf[..path_len].to_vec();
        buf.advance(path_len);

        // Remainder is the payload, possibly empty.
        Ok(Packet {
            header,
            transport_codes,
            path,
            payload: buf.to_vec(),
        })
    }

    /// The header byte this packet encodes to.
    ///
    /// Route and payload-type bits always; bit 7 only when transport codes
    /// are attached. The decoded `payload_version` is never re-emitted.
    pub fn header_byte(&self) -> u8 {
        let mut byte = (self.header.payload_type.code() << 2) | self.header.route_type.bits();
        if self.transport_codes.is_some() {
            byte |= 0x80;
        }
        byte
    }

    /// Serialize to a frame body.
    pub fn encode(&self) -> Vec<u8> {
        let transport_len = if self.transport_codes.is_some() { 4 } else { 0 };
        let mut out =
            Vec::with_capacity(2 + transport_len + self.path.len() + self.payload.len());
        out.push(self.header_byte());
        if let Some((code_a, code_b)) = self.transport_codes {
            out.extend_from_slice(&code_a.to_le_bytes());
            out.extend_from_slice(&code_b.to_le_bytes());
        }
        // Length guaranteed by the constructor.
        out.push(self.path.len() as u8);
        out.extend_from_slice(&self.path);
        out.extend_from_slice(&self.payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_vector_decodes() {
        // RAW_CUSTOM over FLOOD, empty path, payload "AB".
        let packet = Packet::decode(&[0x3D, 0x00, 0x41, 0x42]).expect("valid body");
        assert_eq!(packet.header.payload_type, PayloadType::RawCustom);
        assert_eq!(packet.header.route_type, RouteType::Flood);
        assert_eq!(packet.header.payload_version, 0);
        assert!(!packet.header.has_transport);
        assert!(packet.path.is_empty());
        assert_eq!(packet.payload, b"AB");
    }

    #[test]
    fn reference_vector_encodes() {
        let packet = Packet::new(
            RouteType::Flood,
            PayloadType::RawCustom,
            Vec::new(),
            b"AB".to_vec(),
        )
        .expect("valid packet");
        assert_eq!(packet.header_byte(), 0x3D);
        assert_eq!(packet.encode(), [0x3D, 0x00, 0x41, 0x42]);
    }

    #[test]
    fn roundtrip_with_path() {
        let packet = Packet::new(
            RouteType::Direct,
            PayloadType::Ack,
            vec![0x11, 0x22, 0x33],
            vec![0xAA; 9],
        )
        .expect("valid packet");
        let decoded = Packet::decode(&packet.encode()).expect("roundtrip");
        assert_eq!(decoded, packet);
    }

    #[test]
    fn roundtrip_with_transport_codes() {
        let packet = Packet::new(
            RouteType::TransportDirect,
            PayloadType::TextMessage,
            vec![0x01],
            vec![0xCC; 4],
        )
        .expect("valid packet")
        .with_transport_codes((0x1234, 0xBEEF));

        let body = packet.encode();
        assert_eq!(body[0] & 0x80, 0x80);

        let decoded = Packet::decode(&body).expect("roundtrip");
        assert_eq!(decoded.transport_codes, Some((0x1234, 0xBEEF)));
        assert_eq!(decoded.path, packet.path);
        assert_eq!(decoded.payload, packet.payload);
    }

    #[test]
    fn version_bits_are_decode_only() {
        // 0b01 in bits 6-7 without bit 7: a declared version, no transport.
        let header = Header::from_byte(0x40 | 0x3D);
        assert_eq!(header.payload_version, 1);
        assert!(!header.has_transport);

        // Re-encoding drops the version bits; the documented exception.
        let decoded = Packet::decode(&[0x40 | 0x3D, 0x00]).expect("valid body");
        assert_eq!(decoded.header_byte(), 0x3D);
    }

    #[test]
    fn bit7_reads_as_both_version_and_transport() {
        // The upstream ambiguity: bit 7 contributes to the version field
        // and is simultaneously the has-transport flag.
        let header = Header::from_byte(0x80);
        assert_eq!(header.payload_version, 2);
        assert!(header.has_transport);
    }

    #[test]
    fn empty_body_rejected() {
        assert_eq!(Packet::decode(&[]), Err(PacketError::EmptyBody));
    }

    #[test]
    fn truncated_transport_codes_rejected() {
        let result = Packet::decode(&[0x80, 0x01, 0x02]);
        assert_eq!(
            result,
            Err(PacketError::Truncated {
                field: "transport_codes",
                needed: 2
            })
        );
    }

    #[test]
    fn missing_path_len_rejected() {
        assert_eq!(
            Packet::decode(&[0x3D]),
            Err(PacketError::Truncated {
                field: "path_len",
                needed: 1
            })
        );
    }

    #[test]
    fn truncated_path_rejected() {
        assert_eq!(
            Packet::decode(&[0x3D, 0x05, 0x01, 0x02]),
            Err(PacketError::Truncated {
                field: "path",
                needed: 3
            })
        );
    }

    #[test]
    fn empty_payload_is_valid() {
        let packet = Packet::decode(&[0x0D, 0x00]).expect("valid body");
        assert!(packet.payload.is_empty());
        assert_eq!(packet.header.payload_type, PayloadType::Ack);
    }

    #[test]
    fn overlong_path_rejected_at_construction() {
        let result = Packet::new(
            RouteType::Flood,
            PayloadType::RawCustom,
            vec![0u8; 256],
            Vec::new(),
        );
        assert_eq!(result, Err(PacketError::PathTooLong(256)));
    }

    #[test]
    fn payload_type_codes_roundtrip() {
        for code in 0..=0x0Fu8 {
            assert_eq!(PayloadType::from_code(code).code(), code);
        }
        assert_eq!(PayloadType::from_code(0x0C), PayloadType::Unknown(0x0C));
    }
}
