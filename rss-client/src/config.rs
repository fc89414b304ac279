//! Client configuration.

use rss_types::{HexPoint, KeyType};

use crate::transport::ServerEndpoint;

/// Configuration for an [`RssClient`](crate::RssClient) / [`AnyRssClient`](crate::AnyRssClient).
///
/// Every field here is a recognized option from the protocol's external
/// interface; none of it is persisted between calls.
pub struct RssClientConfig {
    /// The TSS public key the refreshed shares must reconstruct to.
    pub tss_pub_key: HexPoint,
    /// One endpoint per server in the committee, indexed `0..N`.
    pub server_endpoints: Vec<ServerEndpoint>,
    /// The reconstruction threshold `T`.
    pub server_threshold: u16,
    /// Each server's secp256k1 ECIES public key (uncompressed, as a
    /// `HexPoint`), indexed `0..N`.
    pub server_pub_keys: Vec<HexPoint>,
    /// Which curve the TSS key lives on.
    pub key_type: KeyType,
    /// Overrides the client's ephemeral secp256k1 key pair; generated at
    /// random when absent. Exists for deterministic tests.
    pub temp_key: Option<[u8; 32]>,
}

impl RssClientConfig {
    /// Number of servers in the committee.
    pub fn server_count(&self) -> usize {
        self.server_pub_keys.len()
    }

    pub(crate) fn validate_shape(&self) -> Result<(), crate::Error> {
        if self.server_endpoints.len() != self.server_pub_keys.len() {
            return Err(crate::Error::InputInvariant(format!(
                "server_endpoints has {} entries but server_pub_keys has {}",
                self.server_endpoints.len(),
                self.server_pub_keys.len()
            )));
        }
        if usize::from(self.server_threshold) > self.server_pub_keys.len() {
            return Err(crate::Error::InputInvariant(format!(
                "server_threshold {} exceeds server count {}",
                self.server_threshold,
                self.server_pub_keys.len()
            )));
        }
        Ok(())
    }
}
