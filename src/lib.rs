//! # meshwire
//!
//! Wire codec and authenticated decryption for mesh-network packets.
//!
//! Mesh packets ride on a thin transport envelope (observed on an MQTT
//! bridge in the wild, but any byte-oriented transport works). This crate
//! is the codec only: it turns raw frames into structured packets and
//! interpreted payloads, and serializes outbound packets back into frames.
//! Connecting, subscribing, and reporting to humans are the caller's jobs.
//!
//! ## Wire Format
//! ```text
//! [Magic(2)] [Checksum(2)] [Header(1)] [Transport(0|4)] [PathLen(1)] [Path(N)] [Payload(...)]
//! ```
//!
//! ## Pipeline
//! ```text
//! raw frame -> frame::unwrap -> Packet::decode -> decode_payload -> PayloadBody
//! ```
//! Encrypted payload types (direct text, requests/responses, group
//! messages) are opened with a MAC-then-decrypt scheme: a truncated
//! HMAC-SHA256 tag is verified in constant time before AES-128 ever runs.
//! A decoder without a configured secret still decodes all structure and
//! reports encrypted bodies as undecryptable.
//!
//! ## Example
//! ```
//! use meshwire::protocol::decoder::MeshDecoder;
//! use meshwire::core::packet::{Packet, PayloadType, RouteType};
//!
//! let decoder = MeshDecoder::new();
//!
//! // Reference frame: RAW_CUSTOM over FLOOD carrying "AB".
//! let decoded = decoder
//!     .decode_frame(&[0xC0, 0x3E, 0xC0, 0xB9, 0x3D, 0x00, 0x41, 0x42])
//!     .expect("valid frame");
//! assert_eq!(decoded.packet.header.payload_type, PayloadType::RawCustom);
//! assert_eq!(decoded.packet.payload, b"AB");
//!
//! // And back out.
//! let packet = Packet::new(RouteType::Flood, PayloadType::RawCustom, vec![], b"AB".to_vec())
//!     .expect("valid packet");
//! assert_eq!(
//!     decoder.encode_frame(&packet),
//!     [0xC0, 0x3E, 0xC0, 0xB9, 0x3D, 0x00, 0x41, 0x42]
//! );
//! ```
//!
//! Every decode failure is recoverable per message: nothing in this crate
//! panics on arbitrary input, and a bad frame must never take down the
//! delivery loop that feeds it.

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::config::CodecConfig;
pub use crate::core::packet::{Header, Packet, PayloadType, RouteType};
pub use crate::error::{CryptoError, DecodeError, FrameError, PacketError, Result};
pub use crate::protocol::advert::{AdvertKind, AdvertRecord};
pub use crate::protocol::decoder::{DecodedPacket, MeshDecoder};
pub use crate::protocol::payload::{PayloadBody, Sealed, UndecryptableReason};
pub use crate::utils::crypto::SharedSecret;
