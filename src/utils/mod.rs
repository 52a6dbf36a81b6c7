//! Supporting utilities: the authenticated cipher and readable-text
//! rendering for opaque payloads.

pub mod crypto;
pub mod text;
