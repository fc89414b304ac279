//! `/rss_round_2` request and response bodies.

use serde::{Deserialize, Serialize};

use crate::{EncryptedMessage, HexPoint, KeyType};

/// Body of a single target's payload within a `POST {server}/rss_round_2`
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound2RequestData {
    /// Aggregated Feldman commitments to the master polynomial.
    pub master_commits: Vec<HexPoint>,
    /// Aggregated Feldman commitments to the server polynomial.
    pub server_commits: Vec<HexPoint>,
    /// This server's column of co-dealer-encrypted shares: `2T+1` entries
    /// for refresh, `T+1` for import.
    pub server_encs: Vec<EncryptedMessage>,
    /// Factor public keys the server should re-encrypt the summed share to.
    pub factor_pubkeys: Vec<HexPoint>,
}

/// Body of a `POST {server}/rss_round_2` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound2Request {
    /// Always `"rss_round_2"`.
    pub round_name: String,
    /// 1-based index of the server handling this request.
    pub server_index: u16,
    /// Target indices this request carries data for.
    pub target_index: Vec<u8>,
    /// One entry per target index, in the same order.
    pub data: Vec<RssRound2RequestData>,
    /// The TSS curve in use.
    pub key_type: KeyType,
}

/// A server's re-encrypted, factor-key-wrapped share for one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound2ResponseData {
    /// One ciphertext per requested factor public key, in order.
    pub encs: Vec<EncryptedMessage>,
}

/// Response body of a `POST {server}/rss_round_2` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound2Response {
    /// Echoes the requested target indices.
    pub target_index: Vec<u8>,
    /// One entry per requested target index, in the same order.
    pub data: Vec<RssRound2ResponseData>,
}
