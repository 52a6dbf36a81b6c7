//! # Decoder Facade
//!
//! [`MeshDecoder`] runs the full inbound pipeline — envelope unwrap, packet
//! parse, payload dispatch — and the outbound reverse. It owns the only
//! piece of cross-call state, the optional shared secret, and is immutable
//! after construction: one decoder per secret/session, safe to share across
//! delivery threads.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::CodecConfig;
use crate::core::frame;
use crate::core::packet::Packet;
use crate::error::{DecodeError, PacketError, Result};
use crate::protocol::payload::{decode_payload, PayloadBody};
use crate::utils::crypto::SharedSecret;
use crate::utils::text::{looks_readable, readable_text};

/// A fully decoded inbound frame: the structural packet plus its
/// interpreted body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPacket {
    pub packet: Packet,
    pub body: PayloadBody,
}

/// Stateless decode/encode pipeline with an optional shared secret.
#[derive(Debug, Default)]
pub struct MeshDecoder {
    secret: Option<SharedSecret>,
}

impl MeshDecoder {
    /// A decoder with no secret: encrypted payload types report as
    /// undecryptable.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder bound to one shared secret.
    pub fn with_secret(secret: SharedSecret) -> Self {
        MeshDecoder {
            secret: Some(secret),
        }
    }

    /// Build from configuration, decoding the secret if one is set.
    ///
    /// # Errors
    /// Propagates [`hex::FromHexError`] for a malformed `secret_hex`.
    pub fn from_config(config: &CodecConfig) -> std::result::Result<Self, hex::FromHexError> {
        let secret = config
            .secret_hex
            .as_deref()
            .map(SharedSecret::from_hex)
            .transpose()?;
        Ok(MeshDecoder { secret })
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    /// Decode one raw frame from the transport.
    ///
    /// Failures are terminal for this message only; the caller's delivery
    /// loop should log and continue.
    pub fn decode_frame(&self, raw: &[u8]) -> Result<DecodedPacket> {
        let body = frame::unwrap(raw).map_err(|err| {
            warn!(len = raw.len(), %err, "dropping undecodable frame");
            DecodeError::from(err)
        })?;

        let packet = Packet::decode(body).map_err(|err| {
            warn!(%err, "dropping malformed packet");
            DecodeError::from(err)
        })?;

        let decoded = self.decode_packet(packet)?;
        debug!(
            payload_type = decoded.packet.header.payload_type.name(),
            route_type = decoded.packet.header.route_type.name(),
            path_len = decoded.packet.path.len(),
            payload_len = decoded.packet.payload.len(),
            "decoded frame"
        );
        Ok(decoded)
    }

    /// Interpret an already-parsed packet's payload.
    pub fn decode_packet(&self, packet: Packet) -> Result<DecodedPacket> {
        let body = decode_payload(&packet, self.secret.as_ref())
            .map_err(|err: PacketError| {
                warn!(
                    payload_type = packet.header.payload_type.name(),
                    %err,
                    "payload failed structural decode"
                );
                DecodeError::from(err)
            })?;
        if let PayloadBody::Opaque { payload_type, data } = &body {
            if looks_readable(data) {
                debug!(
                    payload_type = payload_type.name(),
                    text = %readable_text(data),
                    "opaque payload looks textual"
                );
            }
        }
        Ok(DecodedPacket { packet, body })
    }

    /// Build an outbound frame from a packet: serialize and wrap.
    pub fn encode_frame(&self, packet: &Packet) -> Vec<u8> {
        frame::wrap(&packet.encode())
    }
}
