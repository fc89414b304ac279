//! Wire encoding of elliptic-curve points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The length, in hex characters, of a zero-padded 32-byte field element.
pub const HEX_WIDTH: usize = 64;

/// A curve point encoded as two zero-padded hex coordinates, or the
/// `{null, null}` sentinel for the group identity.
///
/// `HexPoint` carries no curve information of its own; interpreting the
/// coordinates against a concrete curve is the job of `rss-core`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexPoint {
    /// Lowercase, zero-padded hex x-coordinate, or `None` for the identity.
    pub x: Option<String>,
    /// Lowercase, zero-padded hex y-coordinate, or `None` for the identity.
    pub y: Option<String>,
}

/// Errors produced while parsing a [`HexPoint`] coordinate.
#[derive(Debug, Error)]
pub enum HexPointError {
    /// One coordinate was present and the other absent.
    #[error("point has exactly one of x/y set; expected both or neither")]
    PartialCoordinates,
    /// A coordinate string was not valid hex.
    #[error("coordinate is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl HexPoint {
    /// The `{null, null}` sentinel for the group identity.
    pub fn identity() -> Self {
        Self { x: None, y: None }
    }

    /// Encodes a pair of big-endian coordinate bytes as a point.
    pub fn from_coordinates(x: &[u8], y: &[u8]) -> Self {
        Self {
            x: Some(encode_padded(x)),
            y: Some(encode_padded(y)),
        }
    }

    /// Returns the decoded coordinate bytes, or `None` for the identity.
    ///
    /// Fails if exactly one of `x`/`y` is present, or either is malformed hex.
    pub fn to_coordinates(&self) -> Result<Option<(Vec<u8>, Vec<u8>)>, HexPointError> {
        match (&self.x, &self.y) {
            (None, None) => Ok(None),
            (Some(x), Some(y)) => Ok(Some((hex::decode(x)?, hex::decode(y)?))),
            _ => Err(HexPointError::PartialCoordinates),
        }
    }

    /// Whether this is the `{null, null}` identity sentinel.
    pub fn is_identity(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

fn encode_padded(bytes: &[u8]) -> String {
    let mut buf = [0u8; HEX_WIDTH / 2];
    let start = buf.len().saturating_sub(bytes.len());
    let src_start = bytes.len().saturating_sub(buf.len());
    buf[start..].copy_from_slice(&bytes[src_start..]);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips() {
        let p = HexPoint::identity();
        assert!(p.is_identity());
        assert_eq!(p.to_coordinates().unwrap(), None);
    }

    #[test]
    fn pads_short_coordinates() {
        let p = HexPoint::from_coordinates(&[0x01], &[0xff]);
        assert_eq!(p.x.as_deref().unwrap().len(), HEX_WIDTH);
        assert!(p.x.as_deref().unwrap().ends_with("01"));
        assert!(p.y.as_deref().unwrap().ends_with("ff"));
    }

    #[test]
    fn partial_coordinates_is_an_error() {
        let p = HexPoint {
            x: Some("00".into()),
            y: None,
        };
        assert!(matches!(
            p.to_coordinates(),
            Err(HexPointError::PartialCoordinates)
        ));
    }
}
