//! The selectable TSS curve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which elliptic curve the TSS key material lives on.
///
/// The ECIES wrapping layer always uses secp256k1 regardless of this
/// setting; see the design notes on the curve adapter for why the two are
/// independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// The secp256k1 curve (as used by Bitcoin/Ethereum-style TSS wallets).
    Secp256k1,
    /// The ed25519 curve.
    Ed25519,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyType::Secp256k1 => "secp256k1",
            KeyType::Ed25519 => "ed25519",
        })
    }
}

impl FromStr for KeyType {
    type Err = UnknownKeyType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(KeyType::Secp256k1),
            "ed25519" => Ok(KeyType::Ed25519),
            other => Err(UnknownKeyType(other.to_string())),
        }
    }
}

/// The configured key type string did not name a supported curve.
#[derive(Debug, thiserror::Error)]
#[error("unknown key type: {0}")]
pub struct UnknownKeyType(pub String);
