//! # Authenticated Cipher
//!
//! The MAC-then-decrypt primitive used for peer and group message bodies:
//! a 2-byte HMAC-SHA256 tag over the ciphertext, followed by AES-128
//! decryption in ECB mode and lenient padding removal.
//!
//! ECB with no IV and a 2-byte tag are constraints of the upstream radio
//! protocol, sized for severely bandwidth-limited links. They are matched
//! here exactly; do not "improve" them without breaking interop.
//!
//! Padding removal is a deliberate two-branch policy: strict PKCS7 when the
//! trailing bytes form a valid pad, otherwise trailing-zero stripping. The
//! fallback accommodates peers that transmit zero-filled block-aligned
//! plaintext instead of padding.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Truncated MAC tag length on the wire.
pub const MAC_SIZE: usize = 2;

/// AES-128 block size.
pub const BLOCK_SIZE: usize = 16;

/// Shared-secret key material for authenticated decryption.
///
/// Always 32 bytes: shorter caller input is zero-padded, longer input is
/// truncated, matching how the upstream firmware ingests channel secrets.
/// The full 32 bytes key the HMAC; the first 16 key the AES cipher.
/// Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    pub const LEN: usize = 32;

    /// Build from raw key material, zero-padding or truncating to 32 bytes.
    pub fn from_bytes(material: &[u8]) -> Self {
        let mut key = [0u8; Self::LEN];
        let len = material.len().min(Self::LEN);
        key[..len].copy_from_slice(&material[..len]);
        SharedSecret(key)
    }

    /// Build from a hex string (any length; padded/truncated like
    /// [`from_bytes`](Self::from_bytes)).
    ///
    /// # Errors
    /// Propagates [`hex::FromHexError`] for non-hex input.
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let material = hex::decode(hex_str.trim())?;
        Ok(Self::from_bytes(&material))
    }

    fn hmac_key(&self) -> &[u8] {
        &self.0
    }

    fn aes_key(&self) -> [u8; BLOCK_SIZE] {
        let mut key = [0u8; BLOCK_SIZE];
        key.copy_from_slice(&self.0[..BLOCK_SIZE]);
        key
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never log key material.
        f.write_str("SharedSecret(..)")
    }
}

/// Authenticate and decrypt a `tag ++ ciphertext` buffer.
///
/// # Errors
/// - [`CryptoError::TooShort`] if the buffer cannot hold a tag plus any
///   ciphertext
/// - [`CryptoError::AuthenticationFailed`] if the truncated HMAC does not
///   match (constant-time compare; the cipher never runs on tampered data)
/// - [`CryptoError::InvalidBlockLength`] if the ciphertext is not a whole
///   number of AES blocks
pub fn mac_then_decrypt(secret: &SharedSecret, buffer: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if buffer.len() <= MAC_SIZE {
        return Err(CryptoError::TooShort);
    }
    let (tag, ciphertext) = buffer.split_at(MAC_SIZE);

    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.hmac_key())
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    mac.update(ciphertext);
    mac.verify_truncated_left(tag)
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidBlockLength(ciphertext.len()));
    }

    let cipher = Aes128::new(&secret.aes_key().into());
    let mut plaintext = Vec::with_capacity(ciphertext.len());
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block = GenericArray::clone_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        plaintext.extend_from_slice(&block);
    }

    Ok(strip_padding(plaintext))
}

/// Encrypt with PKCS7 padding and prepend the truncated HMAC tag.
/// Exact inverse of [`mac_then_decrypt`]'s strict branch.
pub fn mac_then_encrypt(secret: &SharedSecret, plaintext: &[u8]) -> Vec<u8> {
    let pad = BLOCK_SIZE - (plaintext.len() % BLOCK_SIZE);
    let mut padded = Vec::with_capacity(plaintext.len() + pad);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + pad, pad as u8);

    // Padded length is a block multiple by construction.
    let sealed = seal_blocks(secret, &padded);
    padded.zeroize();
    sealed
}

/// Encrypt pre-aligned plaintext without adding padding, prepending the
/// truncated HMAC tag. Models peers that send zero-filled block-aligned
/// bodies; such payloads land in [`mac_then_decrypt`]'s zero-strip branch.
///
/// # Errors
/// [`CryptoError::InvalidBlockLength`] if `plaintext` is not a whole number
/// of AES blocks.
pub fn mac_then_encrypt_unpadded(
    secret: &SharedSecret,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if plaintext.is_empty() || plaintext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidBlockLength(plaintext.len()));
    }
    Ok(seal_blocks(secret, plaintext))
}

fn seal_blocks(secret: &SharedSecret, padded: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new(&secret.aes_key().into());
    let mut ciphertext = Vec::with_capacity(padded.len());
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = GenericArray::clone_from_slice(chunk);
        cipher.encrypt_block(&mut block);
        ciphertext.extend_from_slice(&block);
    }

    let mut out = Vec::with_capacity(MAC_SIZE + ciphertext.len());
    match <HmacSha256 as Mac>::new_from_slice(secret.hmac_key()) {
        Ok(mut mac) => {
            mac.update(&ciphertext);
            let tag = mac.finalize().into_bytes();
            out.extend_from_slice(&tag[..MAC_SIZE]);
        }
        // HMAC accepts any key length; unreachable for a 32-byte key.
        Err(_) => out.extend_from_slice(&[0u8; MAC_SIZE]),
    }
    out.extend_from_slice(&ciphertext);
    out
}

/// Two-branch padding removal: strict PKCS7 when the pad verifies, trailing
/// zero stripping otherwise. Never fails.
fn strip_padding(mut plaintext: Vec<u8>) -> Vec<u8> {
    if let Some(&pad) = plaintext.last() {
        let pad_len = usize::from(pad);
        if pad_len >= 1 && pad_len <= BLOCK_SIZE && pad_len <= plaintext.len() {
            let start = plaintext.len() - pad_len;
            if plaintext[start..].iter().all(|&b| b == pad) {
                plaintext.truncate(start);
                return plaintext;
            }
        }
    }
    // No valid PKCS7 pad: treat trailing zeros as filler.
    while plaintext.last() == Some(&0) {
        plaintext.pop();
    }
    plaintext
}
