//! # RSS client engine
//!
//! Drives the two-round refresh secret sharing protocol against a
//! committee of storage servers: issues round 1, acts as the extra
//! co-dealer of the hierarchical sharing, aggregates and verifies every
//! server's Feldman commitments, then issues round 2 and emits
//! factor-encrypted output shares. See [`AnyRssClient`] for the entry
//! point; [`recover`] reconstructs a share later from factor-key
//! ciphertexts alone, without talking to any server.
#![deny(missing_docs)]

mod aggregator;
mod codealer;
pub mod config;
mod engine;
mod error;
pub mod opts;
mod recover;
mod rounds;
pub mod transport;
mod util;

pub use config::RssClientConfig;
pub use engine::RssClient;
pub use error::Error;
pub use opts::{ImportOpts, RefreshOpts};
pub use recover::{recover as recover_share, RecoverOpts};
pub use rss_core::curve::{Ed25519Curve, Secp256k1Curve};
pub use rss_types::api::RefreshResponse;

/// A client whose TSS curve was picked at runtime from
/// [`RssClientConfig::key_type`].
///
/// The protocol logic itself ([`RssClient<C>`]) is written once, generic
/// over the curve; this enum is the "tagged variant" the configuration's
/// `key_type` dispatches into.
pub enum AnyRssClient {
    /// A client configured for the secp256k1 TSS curve.
    Secp256k1(RssClient<Secp256k1Curve>),
    /// A client configured for the ed25519 TSS curve.
    Ed25519(RssClient<Ed25519Curve>),
}

impl AnyRssClient {
    /// Builds a client from the given configuration, picking the concrete
    /// curve implementation from `config.key_type`.
    pub fn new(config: RssClientConfig) -> Result<Self, Error> {
        Ok(match config.key_type {
            rss_types::KeyType::Secp256k1 => AnyRssClient::Secp256k1(RssClient::new(config)?),
            rss_types::KeyType::Ed25519 => AnyRssClient::Ed25519(RssClient::new(config)?),
        })
    }

    /// See [`RssClient::refresh`].
    pub async fn refresh(&self, opts: RefreshOpts) -> Result<Vec<RefreshResponse>, Error> {
        match self {
            AnyRssClient::Secp256k1(client) => client.refresh(opts).await,
            AnyRssClient::Ed25519(client) => client.refresh(opts).await,
        }
    }

    /// See [`RssClient::import`].
    pub async fn import(&self, opts: opts::ImportOpts) -> Result<Vec<RefreshResponse>, Error> {
        match self {
            AnyRssClient::Secp256k1(client) => client.import(opts).await,
            AnyRssClient::Ed25519(client) => client.import(opts).await,
        }
    }
}
