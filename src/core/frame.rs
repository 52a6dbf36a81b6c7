//! # Frame Envelope
//!
//! The outermost wire envelope around every mesh packet:
//!
//! ```text
//! [Magic(2, BE)] [Checksum(2, LE)] [Packet body(N)]
//! ```
//!
//! The magic constant `0xC03E` guards against misinterpreting unrelated
//! traffic on the shared transport; the Fletcher-16 checksum covers the
//! packet body only. [`unwrap`] validates and strips the envelope,
//! [`wrap`] builds it, and `unwrap(wrap(b)) == b` holds for every body.

use crate::core::checksum::fletcher16;
use crate::error::FrameError;

/// Magic bytes identifying a mesh frame (0xC03E big-endian).
pub const MAGIC_BYTES: [u8; 2] = [0xC0, 0x3E];

/// Envelope overhead: magic plus checksum.
pub const HEADER_LEN: usize = 4;

/// Validate the envelope of `raw` and return the inner packet body.
///
/// # Errors
/// - [`FrameError::TooShort`] if fewer than [`HEADER_LEN`] bytes
/// - [`FrameError::BadMagic`] if the first two bytes are not [`MAGIC_BYTES`]
/// - [`FrameError::ChecksumMismatch`] if the little-endian checksum field
///   does not match the Fletcher-16 sum of the body
pub fn unwrap(raw: &[u8]) -> Result<&[u8], FrameError> {
    if raw.len() < HEADER_LEN {
        return Err(FrameError::TooShort(raw.len()));
    }

    let magic = u16::from_be_bytes([raw[0], raw[1]]);
    if magic != u16::from_be_bytes(MAGIC_BYTES) {
        return Err(FrameError::BadMagic(magic));
    }

    let received = u16::from_le_bytes([raw[2], raw[3]]);
    let body = &raw[HEADER_LEN..];
    let calculated = fletcher16(body);
    if received != calculated {
        return Err(FrameError::ChecksumMismatch {
            received,
            calculated,
        });
    }

    Ok(body)
}

/// Wrap a packet body in the frame envelope.
pub fn wrap(body: &[u8]) -> Vec<u8> {
    let checksum = fletcher16(body);
    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    frame.extend_from_slice(&MAGIC_BYTES);
    frame.extend_from_slice(&checksum.to_le_bytes());
    frame.extend_from_slice(body);
    frame
}
