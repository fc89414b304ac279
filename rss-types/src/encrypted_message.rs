//! The ECIES wire envelope.

use serde::{Deserialize, Serialize};

/// A hybrid-encrypted message, exactly as it crosses the wire.
///
/// Every field is a lowercase hex string. `rss-crypto` is responsible for
/// producing and consuming these; this type only carries the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// AES-CBC ciphertext bytes, hex-encoded.
    pub ciphertext: String,
    /// Uncompressed secp256k1 ephemeral public key (`04 || x || y`), hex-encoded.
    #[serde(rename = "ephemPublicKey")]
    pub ephem_public_key: String,
    /// AES-CBC initialization vector, hex-encoded.
    pub iv: String,
    /// HMAC-SHA256 authentication tag, hex-encoded.
    pub mac: String,
}
