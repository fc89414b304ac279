//! The polymorphic request channel to a single server.
//!
//! Modelled as a capability trait — `{ get(path), post(path, body) }` — with
//! a tagged enum dispatching between a real HTTP endpoint and an in-process
//! mock, so the engine never needs to know which one it is talking to.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Opaque transport-layer failure. Carried through only for diagnostic
/// logging; the engine never inspects its contents to decide control flow.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP request failed (connection, TLS, timeout, …).
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server returned a non-success status code.
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
    /// The response body was not valid JSON, or not the JSON shape expected.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    /// The in-process mock endpoint reported a failure.
    #[error("mock endpoint error: {0}")]
    Mock(String),
}

/// The capability every server endpoint exposes, whether it is reached over
/// the network or served in-process by a test harness.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Issues a `GET {path}` request, returning the parsed JSON body.
    async fn get(&self, path: &str) -> Result<Value, TransportError>;
    /// Issues a `POST {path}` request with a JSON body, returning the parsed
    /// JSON response.
    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError>;
}

/// A real HTTP endpoint reached over the network.
pub struct HttpEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEndpoint {
    /// Builds an endpoint rooted at `base_url` (e.g. `https://server.example`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Endpoint for HttpEndpoint {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(response.json().await?)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(response.json().await?)
    }
}

/// A server endpoint: either a remote URL, or an in-process mock
/// implementing the same [`Endpoint`] capability.
///
/// This is the tagged variant the engine dispatches through; it never needs
/// to match on it itself, since `ServerEndpoint` implements [`Endpoint`].
pub enum ServerEndpoint {
    /// A real server reached over HTTP.
    Remote(HttpEndpoint),
    /// An in-process stand-in (typically a test mock server).
    Mock(Arc<dyn Endpoint>),
}

impl ServerEndpoint {
    /// Convenience constructor for a remote URL.
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self::Remote(HttpEndpoint::new(base_url))
    }

    /// Convenience constructor for an in-process mock.
    pub fn mock(endpoint: Arc<dyn Endpoint>) -> Self {
        Self::Mock(endpoint)
    }
}

#[async_trait]
impl Endpoint for ServerEndpoint {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        match self {
            ServerEndpoint::Remote(endpoint) => endpoint.get(path).await,
            ServerEndpoint::Mock(endpoint) => endpoint.get(path).await,
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        match self {
            ServerEndpoint::Remote(endpoint) => endpoint.post(path, body).await,
            ServerEndpoint::Mock(endpoint) => endpoint.post(path, body).await,
        }
    }
}
