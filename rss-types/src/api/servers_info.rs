//! Server-committee descriptors shared by both rounds.

use serde::{Deserialize, Serialize};

use crate::HexPoint;

/// Describes one side (old or new) of the server committee for a round-1
/// request: the full set of server public keys plus which ones were
/// selected to participate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServersInfo {
    /// Public key of every server in the committee, indexed `0..N`.
    pub pubkeys: Vec<HexPoint>,
    /// The reconstruction threshold `T`.
    pub threshold: u16,
    /// 1-based indices of the servers selected for this round.
    ///
    /// Length is `T` for a single-sided round or `2T` when old and new are
    /// combined; all entries are distinct and within `[1, N]`.
    pub selected: Vec<u16>,
}
