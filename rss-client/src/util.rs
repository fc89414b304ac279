//! Small, shared conversions between wire types and the byte encodings the
//! ECIES layer and the curve adapter expect.

use rss_types::HexPoint;

use crate::Error;

/// Encodes a `HexPoint` as an uncompressed secp256k1 public key
/// (`04 || x || y`, 65 bytes), as required by the ECIES layer.
pub fn hex_point_to_uncompressed(point: &HexPoint) -> Result<Vec<u8>, Error> {
    let (x, y) = point
        .to_coordinates()?
        .ok_or_else(|| Error::InputInvariant("expected a non-identity point".into()))?;
    let mut out = Vec::with_capacity(65);
    out.push(0x04);
    out.extend_from_slice(&x);
    out.extend_from_slice(&y);
    Ok(out)
}
