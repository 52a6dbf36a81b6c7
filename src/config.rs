//! # Configuration Management
//!
//! Structured configuration for the codec, loadable from TOML.
//!
//! The only tunable today is the shared secret used for encrypted payload
//! types. It is deliberately optional: a decoder without a secret still
//! decodes everything structural and reports encrypted bodies as
//! undecryptable.
//!
//! The secret arrives as hex. Normalizing app-supplied PSKs (base64,
//! URL-encoded) into hex is the job of an external tool; this crate only
//! consumes the decoded material.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, DecodeError, FrameError};

/// Codec configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CodecConfig {
    /// Shared secret as a hex string. Any length; key material is
    /// zero-padded or truncated to 32 bytes on use.
    #[serde(default)]
    pub secret_hex: Option<String>,
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(content).map_err(|e| ConfigError(format!("failed to parse TOML: {e}")))
    }

    /// Validate the configuration. Returns a list of problems; empty means
    /// valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(ref secret) = self.secret_hex {
            let trimmed = secret.trim();
            if trimmed.is_empty() {
                errors.push("secret_hex is set but empty".to_string());
            } else if hex::decode(trimmed).is_err() {
                let preview: String = trimmed.chars().take(8).collect();
                errors.push(format!("secret_hex is not valid hex: '{preview}'"));
            } else if trimmed.len() != 32 {
                errors.push(format!(
                    "secret_hex is {} hex characters; 32 (16 bytes) is the usual channel PSK \
                     length, other lengths are padded or truncated",
                    trimmed.len()
                ));
            }
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<(), ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError(format!(
                "validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

// Re-exported wire constants, kept alongside the config the way callers
// expect to find them.

/// Magic bytes identifying a mesh frame.
pub use crate::core::frame::MAGIC_BYTES;

/// Convenience check used by transports peeking at buffered bytes.
pub fn looks_like_frame(raw: &[u8]) -> Result<(), DecodeError> {
    if raw.len() < 2 {
        return Err(FrameError::TooShort(raw.len()).into());
    }
    let magic = u16::from_be_bytes([raw[0], raw[1]]);
    if magic != u16::from_be_bytes(MAGIC_BYTES) {
        return Err(FrameError::BadMagic(magic).into());
    }
    Ok(())
}
