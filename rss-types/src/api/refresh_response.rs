//! The client's top-level output type.

use serde::{Deserialize, Serialize};

use crate::{EncryptedMessage, HexPoint};

/// One target index's worth of refreshed, factor-encrypted share material.
///
/// `server_factor_encs` preserves the server's original index: an entry is
/// `None` wherever that server's round-2 response was unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// The target index (2 or 3) this entry refreshed a share for.
    pub target_index: u8,
    /// The factor public key this entry's ciphertexts are encrypted to.
    pub factor_pub: HexPoint,
    /// Server-side re-encrypted shares, indexed `0..N`; `None` for servers
    /// that did not respond in round 2.
    pub server_factor_encs: Vec<Option<EncryptedMessage>>,
    /// The client-side user share, encrypted to `factor_pub`.
    pub user_factor_enc: EncryptedMessage,
}
