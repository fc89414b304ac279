//! Caller-facing arguments to [`refresh`](crate::RssClient::refresh) and
//! [`import`](crate::RssClient::import).

use rss_types::HexPoint;

/// Arguments to a refresh call: the client holds one share of the current
/// master secret and wants the server-side sub-sharing re-randomized.
pub struct RefreshOpts {
    /// Session label covering the currently live ("old") server shares.
    pub old_label: String,
    /// Session label covering the freshly generated ("new") server shares.
    pub new_label: String,
    /// Opaque, pass-through authentication signatures.
    pub sigs: Vec<String>,
    /// Public key corresponding to the other half of the 2-of-2 master
    /// secret (the "DKG" share the client does not hold).
    pub dkg_new_pub: HexPoint,
    /// The user's current share of the master secret, as 32-byte big-endian
    /// scalar bytes in the TSS curve's scalar field.
    pub input_share: [u8; 32],
    /// The index (2 or 3) the current `input_share` was generated at.
    pub input_index: u8,
    /// Which indices to produce a refreshed share for; a subset of `{2, 3}`.
    pub target_indexes: Vec<u8>,
    /// 1-based indices of the `T` servers selected to co-deal this round.
    pub selected_servers: Vec<u16>,
    /// One factor public key per target index, in the same order.
    pub factor_pubs: Vec<HexPoint>,
}

/// Arguments to an import call: an externally generated secret is being
/// brought into the sharing scheme for the first time, with no "old" side.
pub struct ImportOpts {
    /// Session label covering the freshly generated server shares.
    pub new_label: String,
    /// Opaque, pass-through authentication signatures.
    pub sigs: Vec<String>,
    /// Public key corresponding to the other half of the 2-of-2 master
    /// secret.
    pub dkg_new_pub: HexPoint,
    /// The externally generated secret being imported, as 32-byte
    /// big-endian scalar bytes.
    pub import_key: [u8; 32],
    /// Which indices to produce a share for; a subset of `{2, 3}`.
    pub target_indexes: Vec<u8>,
    /// 1-based indices of the `T` servers selected to co-deal this round.
    pub selected_servers: Vec<u16>,
    /// One factor public key per target index, in the same order.
    pub factor_pubs: Vec<HexPoint>,
}
