//! The engine's error taxonomy.
//!
//! Mirrors the abstract kinds in the protocol's error design: callers match
//! on variant, not message text.

use thiserror::Error;

/// Everything that can go wrong driving a refresh/import/recover call.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied arguments were internally inconsistent (mismatched
    /// lengths, an out-of-range index, an unknown key type).
    #[error("invalid input: {0}")]
    InputInvariant(String),

    /// A server's round-1 response had a commitment vector of the wrong
    /// length.
    #[error("commitment vector has the wrong shape: {0}")]
    CommitShape(String),

    /// Aggregated commitments violated one of the round-1 algebraic
    /// identities.
    #[error("aggregated commitments are inconsistent: {0}")]
    CommitConsistency(String),

    /// The decrypted, summed user share failed the `g·u == m0 + 99·m1`
    /// check.
    #[error("decrypted user share is inconsistent with the commitments")]
    ShareConsistency,

    /// An ECIES ciphertext the client must read failed to decrypt.
    #[error("failed to decrypt: {0}")]
    Decrypt(#[from] rss_crypto::EciesError),

    /// Fewer than `T` servers produced a usable response.
    #[error("insufficient server responses: needed {needed}, got {got}")]
    Availability {
        /// The configured threshold `T`.
        needed: u16,
        /// The number of usable responses actually collected.
        got: u16,
    },

    /// The curve adapter rejected a point from the wire.
    #[error("invalid curve point: {0}")]
    Curve(#[from] rss_core::curve::CurveError),

    /// A `HexPoint` coordinate was malformed or only half-present.
    #[error("malformed hex point: {0}")]
    HexPoint(#[from] rss_types::HexPointError),

    /// A polynomial-kit operation failed (zero denominator, length
    /// mismatch).
    #[error("polynomial arithmetic error: {0}")]
    Poly(#[from] rss_core::poly::PolyError),

    /// Opaque transport-layer failure; carried through only for logging.
    #[error("transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),
}
