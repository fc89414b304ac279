//! Wraps a [`MockNode`]'s axum router as an in-process
//! [`rss_client::transport::Endpoint`], so the client can talk to it exactly
//! as it would a remote server.

use async_trait::async_trait;
use axum_test::TestServer;
use rss_client::transport::{Endpoint, TransportError};
use serde_json::Value;

use crate::server::MockNode;

/// An in-process stand-in for one committee member.
pub struct MockEndpoint {
    server: TestServer,
}

impl MockEndpoint {
    /// Builds an endpoint serving the given node's router in-process.
    pub fn new(node: &MockNode) -> Self {
        let server =
            TestServer::new(node.router()).expect("axum router always builds a valid test server");
        Self { server }
    }
}

#[async_trait]
impl Endpoint for MockEndpoint {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let response = self.server.get(path).await;
        into_value(response)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let response = self.server.post(path).json(&body).await;
        into_value(response)
    }
}

fn into_value(response: axum_test::TestResponse) -> Result<Value, TransportError> {
    if !response.status_code().is_success() {
        return Err(TransportError::Status(response.status_code()));
    }
    Ok(serde_json::from_str(&response.text()).unwrap_or(Value::Null))
}
