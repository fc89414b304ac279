//! Assembles a full committee of [`MockNode`]s wired up as
//! [`ServerEndpoint::Mock`] entries, ready to drop into an
//! [`RssClientConfig`](rss_client::RssClientConfig).

use std::sync::Arc;

use rss_client::transport::ServerEndpoint;
use rss_types::HexPoint;

use crate::endpoint::MockEndpoint;
use crate::server::MockNode;

/// An `N`-node committee with its nodes, public keys, and client-facing
/// endpoints all kept in the same 1-based index order.
pub struct Committee {
    /// The underlying nodes, in index order (`nodes[0]` is server 1).
    pub nodes: Vec<MockNode>,
    /// Each node's ECIES public key, indexed `0..N` (matches
    /// `RssClientConfig::server_pub_keys`).
    pub server_pub_keys: Vec<HexPoint>,
    /// Each node wrapped as a client-facing endpoint, indexed `0..N`
    /// (matches `RssClientConfig::server_endpoints`).
    pub server_endpoints: Vec<ServerEndpoint>,
}

impl Committee {
    /// Builds a committee of `count` freshly generated nodes, indexed `1..=count`.
    pub fn new(count: u16) -> Self {
        let nodes: Vec<MockNode> = (1..=count).map(MockNode::new).collect();
        let server_pub_keys = nodes.iter().map(MockNode::ecies_pub_key).collect();
        let server_endpoints = nodes
            .iter()
            .map(|node| ServerEndpoint::mock(Arc::new(MockEndpoint::new(node))))
            .collect();
        Self {
            nodes,
            server_pub_keys,
            server_endpoints,
        }
    }

    /// The 1-based indices of every node in the committee.
    pub fn all_indices(&self) -> Vec<u16> {
        self.nodes.iter().map(MockNode::index).collect()
    }

    /// The node registered at the given 1-based index, if any.
    pub fn node(&self, index: u16) -> Option<&MockNode> {
        self.nodes.iter().find(|n| n.index() == index)
    }
}
