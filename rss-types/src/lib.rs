//! # RSS wire types
//!
//! Data transfer objects exchanged between an [`rss-client`](https://docs.rs/rss-client)
//! and a committee of refresh-secret-sharing servers. Everything here is plain,
//! serde-friendly data: no cryptographic behaviour lives in this crate.
#![deny(missing_docs)]

pub mod api;
mod encrypted_message;
mod hex_point;
mod key_type;

pub use encrypted_message::EncryptedMessage;
pub use hex_point::{HexPoint, HexPointError};
pub use key_type::KeyType;

/// The user's share always sits at this index of the master polynomial.
///
/// This is a protocol invariant, not a configuration knob: see the design
/// notes on why `99` must never be made caller-settable.
pub const USER_SHARE_INDEX: u64 = 99;
