//! # Core Wire Format
//!
//! Low-level framing and packet layout, independent of payload semantics.
//!
//! ## Components
//! - **Checksum**: Fletcher-16 over the packet body
//! - **Frame**: magic + checksum envelope validation and construction
//! - **Packet**: header bit fields, optional transport codes, path, payload
//!
//! ## Wire Format
//! ```text
//! [Magic(2)] [Checksum(2)] [Header(1)] [Transport(0|4)] [PathLen(1)] [Path(N)] [Payload(...)]
//! ```

pub mod checksum;
pub mod frame;
pub mod packet;
