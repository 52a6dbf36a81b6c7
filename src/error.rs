//! # Error Types
//!
//! Error handling for the mesh wire codec.
//!
//! Failures are split into three layers matching the decode pipeline:
//! - [`FrameError`]: the outer envelope (magic, checksum) is unusable
//! - [`PacketError`]: the inner packet structure is malformed
//! - [`CryptoError`]: an encrypted body failed authentication or decryption
//!
//! Every error is recoverable per message: a failed decode means "this
//! message cannot be interpreted further" and must never abort processing of
//! subsequent messages. Encrypted payloads that cannot be opened (missing
//! secret, bad MAC) are reported through the separate
//! [`Sealed`](crate::protocol::payload::Sealed) outcome rather than through
//! these error types, so callers never confuse "undecryptable" with
//! "structurally malformed".

use serde::Serialize;
use thiserror::Error;

/// Envelope-level failures from [`frame::unwrap`](crate::core::frame::unwrap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameError {
    #[error("frame too short: {0} bytes (minimum 4)")]
    TooShort(usize),

    #[error("bad magic: 0x{0:04X}")]
    BadMagic(u16),

    #[error("checksum mismatch: received 0x{received:04X}, calculated 0x{calculated:04X}")]
    ChecksumMismatch { received: u16, calculated: u16 },
}

/// Structural failures while parsing or building a [`Packet`](crate::core::packet::Packet).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PacketError {
    #[error("empty packet body")]
    EmptyBody,

    #[error("truncated packet: needed {needed} more bytes for {field}")]
    Truncated { field: &'static str, needed: usize },

    #[error("path too long: {0} entries (maximum 255)")]
    PathTooLong(usize),
}

/// Authenticated-decryption failures from
/// [`mac_then_decrypt`](crate::utils::crypto::mac_then_decrypt).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CryptoError {
    #[error("ciphertext too short to carry a MAC")]
    TooShort,

    #[error("MAC verification failed")]
    AuthenticationFailed,

    #[error("ciphertext length {0} is not a multiple of the cipher block size")]
    InvalidBlockLength(usize),
}

/// Umbrella error for the full decode pipeline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecodeError {
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Configuration loading/validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

/// Type alias for Results using DecodeError
pub type Result<T> = std::result::Result<T, DecodeError>;
