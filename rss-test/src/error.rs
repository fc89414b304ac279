//! Error type for the mock server's HTTP handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Everything that can go wrong handling a round-1/round-2 request against a
/// [`crate::server::MockNode`].
///
/// Unlike the client's [`rss_client::Error`], callers never match on this by
/// variant: a mock server failure is just "this server did not answer
/// usably this round", which the client already tolerates for round 2 and
/// fails fast on for round 1.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// A target, server, or share index fell outside its allowed range.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// No share was registered under the requested label.
    #[error("no tss share registered under label {0:?}")]
    UnknownLabel(String),
    /// The aggregated round-1 commitments failed a Feldman consistency
    /// check before this server would sign off on round 2.
    #[error("commitment consistency check failed: {0}")]
    CommitConsistency(String),
    /// A curve-adapter conversion failed on an incoming `HexPoint`.
    #[error(transparent)]
    Curve(#[from] rss_core::curve::CurveError),
    /// A polynomial-kit operation failed (always a caller bug: duplicate
    /// index in a committee or selected-server list).
    #[error(transparent)]
    Poly(#[from] rss_core::poly::PolyError),
    /// An ECIES ciphertext this server must read failed to decrypt.
    #[error(transparent)]
    Decrypt(#[from] rss_crypto::EciesError),
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "mock server request failed");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
