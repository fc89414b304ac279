//! In-process test double for the server side of the refresh secret sharing
//! protocol.
//!
//! [`MockNode`] implements the server-side half of the round-1/round-2
//! subprotocol; [`MockEndpoint`] wraps its axum router as a
//! [`rss_client::transport::Endpoint`] so a real
//! [`rss_client::RssClient`] can be driven against it without a socket.
//! [`committee`] assembles a full `N`-node committee ready to drop into an
//! [`rss_client::RssClientConfig`], and [`fixture`] builds DKG states that
//! satisfy the protocol's round-1 consistency checks for a single target
//! index.
#![deny(missing_docs)]

pub mod committee;
mod endpoint;
mod error;
pub mod fixture;
mod server;

pub use endpoint::MockEndpoint;
pub use error::MockError;
pub use server::MockNode;
