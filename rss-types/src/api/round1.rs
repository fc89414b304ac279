//! `/rss_round_1` request and response bodies.

use serde::{Deserialize, Serialize};

use crate::{EncryptedMessage, HexPoint, KeyType};

use super::servers_info::ServersInfo;

/// Which side of the hierarchical sharing a round-1 request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerSet {
    /// The currently live server-side sub-sharing.
    Old,
    /// The freshly generated server-side sub-sharing.
    New,
}

/// Opaque, pass-through session authentication.
///
/// `sigs` is never verified by the client; see the design notes for why
/// label-signature verification is left as a server-side hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auth {
    /// The session label the signatures are claimed to cover.
    pub label: String,
    /// Opaque signatures, passed through verbatim.
    pub sigs: Vec<String>,
}

/// Body of a `POST {server}/rss_round_1` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound1Request {
    /// Always `"rss_round_1"`; present for dispatch symmetry with round 2.
    pub round_name: String,
    /// Whether this request concerns the old or new server sub-sharing.
    pub server_set: ServerSet,
    /// 1-based index of the server handling this request.
    pub server_index: u16,
    /// Describes the old committee; present for refresh, absent for import.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_servers_info: Option<ServersInfo>,
    /// Describes the new committee.
    pub new_servers_info: ServersInfo,
    /// Index (2 or 3) of the user's input share; present for refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_user_share_index: Option<u8>,
    /// The client's ephemeral temporary public key (always secp256k1).
    pub user_temp_pubkey: HexPoint,
    /// Target indices to produce a sharing contribution for.
    pub target_index: Vec<u8>,
    /// Pass-through session authentication.
    pub auth: Auth,
    /// The TSS curve in use.
    pub key_type: KeyType,
}

/// The encrypted co-dealer contribution for one target index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetEncryptions {
    /// The user's encrypted share of the master polynomial at index 99.
    pub user_enc: EncryptedMessage,
    /// Server-encrypted shares of the server polynomial, indexed `0..N`.
    pub server_encs: Vec<EncryptedMessage>,
}

/// One co-dealer's contribution for a single target index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound1ResponseData {
    /// Feldman commitments to the degree-1 master polynomial, `[g·a0, g·a1]`.
    pub master_poly_commits: Vec<HexPoint>,
    /// Feldman commitments to the degree-`T-1` server polynomial.
    pub server_poly_commits: Vec<HexPoint>,
    /// Encrypted shares derived from this co-dealer's polynomials.
    pub target_encryptions: TargetEncryptions,
}

/// Response body of a `POST {server}/rss_round_1` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RssRound1Response {
    /// Echoes the requested target indices.
    pub target_index: Vec<u8>,
    /// One entry per requested target index, in the same order.
    pub data: Vec<RssRound1ResponseData>,
}
