//! # Payload Interpretation
//!
//! Everything above the raw packet layout: per-type payload decoding,
//! advert records, decrypted message shapes, and the [`MeshDecoder`]
//! facade that ties the pipeline together.
//!
//! [`MeshDecoder`]: decoder::MeshDecoder

pub mod advert;
pub mod decoder;
pub mod message;
pub mod payload;

#[cfg(test)]
mod tests;
