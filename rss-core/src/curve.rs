//! Uniform adapter over the two curves a TSS key can live on.
//!
//! The refresh protocol's equations only ever need a prime-order group with
//! a known generator; [`TssCurve`] is the minimal surface that exposes, plus
//! hex encoding to/from the wire [`HexPoint`](rss_types::HexPoint) type.

use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{Field, PrimeField, UniformRand, Zero};
use rand::RngCore;
use rss_types::HexPoint;
use thiserror::Error;

/// Errors raised while converting between curve-native types and the wire
/// encoding.
#[derive(Debug, Error)]
pub enum CurveError {
    /// A `HexPoint` coordinate was not valid hex, or only one of x/y was set.
    #[error("malformed hex point: {0}")]
    MalformedPoint(#[from] rss_types::HexPointError),
    /// Decoded coordinates do not lie on the curve, or not in the prime
    /// order subgroup.
    #[error("point is not on the curve, or not in the correct subgroup")]
    NotOnCurve,
}

/// A curve usable as the TSS sharing group.
///
/// Implemented for [`Secp256k1Curve`] and [`Ed25519Curve`]; the rest of the
/// crate is generic over this trait so the protocol logic is written once.
pub trait TssCurve: 'static + Send + Sync + Clone + Copy {
    /// The curve's group in projective form.
    type Projective: CurveGroup<Affine = Self::Affine> + PrimeGroup<ScalarField = Self::Scalar>;
    /// The curve's group in affine form; what gets hex-encoded.
    type Affine: AffineRepr<ScalarField = Self::Scalar, BaseField = Self::BaseField>
        + Send
        + Sync;
    /// The scalar field of prime order `n`; used for all Shamir/Lagrange
    /// arithmetic.
    type Scalar: PrimeField;
    /// The coordinate (base) field points are expressed in.
    type BaseField: PrimeField;

    /// Human-readable curve name, as it appears in `key_type` on the wire.
    fn name() -> &'static str;

    /// The curve's generator point `G`.
    fn generator() -> Self::Affine {
        Self::Affine::generator()
    }

    /// Builds an affine point from raw coordinates. Does not check that the
    /// result lies on the curve; callers validate separately when the
    /// coordinates come from untrusted input.
    fn point_from_xy(x: Self::BaseField, y: Self::BaseField) -> Self::Affine;
}

/// The secp256k1 curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1Curve;

impl TssCurve for Secp256k1Curve {
    type Projective = ark_secp256k1::Projective;
    type Affine = ark_secp256k1::Affine;
    type Scalar = ark_secp256k1::Fr;
    type BaseField = ark_secp256k1::Fq;

    fn name() -> &'static str {
        "secp256k1"
    }

    fn point_from_xy(x: Self::BaseField, y: Self::BaseField) -> Self::Affine {
        ark_secp256k1::Affine::new_unchecked(x, y)
    }
}

/// The ed25519 curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Curve;

impl TssCurve for Ed25519Curve {
    type Projective = ark_ed25519::EdwardsProjective;
    type Affine = ark_ed25519::EdwardsAffine;
    type Scalar = ark_ed25519::Fr;
    type BaseField = ark_ed25519::Fq;

    fn name() -> &'static str {
        "ed25519"
    }

    fn point_from_xy(x: Self::BaseField, y: Self::BaseField) -> Self::Affine {
        ark_ed25519::EdwardsAffine::new_unchecked(x, y)
    }
}

/// Encodes a point as a [`HexPoint`], using the `{null, null}` sentinel for
/// the identity (satisfies P6: `hexPoint(ecPoint(p)) == p`).
pub fn point_to_hex<C: TssCurve>(point: C::Affine) -> HexPoint {
    match point.xy() {
        Some((x, y)) => HexPoint::from_coordinates(&field_to_be_bytes(x), &field_to_be_bytes(y)),
        None => HexPoint::identity(),
    }
}

/// Decodes a [`HexPoint`] back into a curve point, validating that
/// non-identity points actually lie on the curve and in the correct
/// subgroup.
pub fn hex_to_point<C: TssCurve>(point: &HexPoint) -> Result<C::Affine, CurveError> {
    match point.to_coordinates()? {
        None => Ok(C::Affine::zero()),
        Some((x, y)) => {
            let x = C::BaseField::from_be_bytes_mod_order(&x);
            let y = C::BaseField::from_be_bytes_mod_order(&y);
            let affine = C::point_from_xy(x, y);
            if !on_curve_and_in_subgroup(&affine) {
                return Err(CurveError::NotOnCurve);
            }
            Ok(affine)
        }
    }
}

fn on_curve_and_in_subgroup<A: AffineRepr>(point: &A) -> bool {
    point.is_zero() || (point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve())
}

/// Encodes a field element as fixed-width 32-byte big-endian bytes.
pub fn field_to_be_bytes<F: PrimeField>(f: F) -> Vec<u8> {
    let raw = f.into_bigint().to_bytes_be();
    let mut buf = vec![0u8; 32];
    let start = buf.len().saturating_sub(raw.len());
    buf[start..].copy_from_slice(&raw[raw.len().saturating_sub(32)..]);
    buf
}

/// Decodes fixed-width big-endian bytes into a field element, reducing
/// modulo the field's order.
pub fn field_from_be_bytes<F: PrimeField>(bytes: &[u8]) -> F {
    F::from_be_bytes_mod_order(bytes)
}

/// Draws a uniformly random, non-zero scalar in `[1, n)`.
pub fn random_nonzero_scalar<F: PrimeField>(rng: &mut (impl RngCore + rand::CryptoRng)) -> F {
    loop {
        let candidate = F::rand(rng);
        if !candidate.is_zero() {
            return candidate;
        }
    }
}

/// Multiplies the generator by a scalar, i.e. computes a public key / Feldman
/// commitment term from a secret coefficient.
pub fn commit<C: TssCurve>(scalar: C::Scalar) -> C::Affine {
    (C::generator().into_group() * scalar).into_affine()
}

/// Adds two affine points, returning the result in affine form.
pub fn add_affine<C: TssCurve>(a: C::Affine, b: C::Affine) -> C::Affine {
    (a.into_group() + b).into_affine()
}

/// Sums a list of affine points, returning the result in affine form. Empty
/// input yields the identity.
pub fn sum_affine<C: TssCurve>(points: impl IntoIterator<Item = C::Affine>) -> C::Affine {
    points
        .into_iter()
        .fold(C::Projective::zero(), |acc, p| acc + p)
        .into_affine()
}

/// Checks the field inverse exists before calling it, surfacing `None`
/// uniformly for the zero-denominator case callers need to detect.
pub fn try_invert<F: Field>(value: F) -> Option<F> {
    value.inverse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    #[test]
    fn identity_round_trips_secp256k1() {
        let hp = point_to_hex::<Secp256k1Curve>(<Secp256k1Curve as TssCurve>::Affine::zero());
        assert!(hp.is_identity());
        let back = hex_to_point::<Secp256k1Curve>(&hp).unwrap();
        assert!(back.is_zero());
    }

    #[test]
    fn generator_round_trips_both_curves() {
        let g = Secp256k1Curve::generator();
        let hp = point_to_hex::<Secp256k1Curve>(g);
        let back = hex_to_point::<Secp256k1Curve>(&hp).unwrap();
        assert_eq!(g, back);

        let g = Ed25519Curve::generator();
        let hp = point_to_hex::<Ed25519Curve>(g);
        let back = hex_to_point::<Ed25519Curve>(&hp).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn random_scalar_commit_round_trips_through_hex() {
        let mut rng = rng();
        let s: <Secp256k1Curve as TssCurve>::Scalar = random_nonzero_scalar(&mut rng);
        let p = commit::<Secp256k1Curve>(s);
        let hp = point_to_hex::<Secp256k1Curve>(p);
        let back = hex_to_point::<Secp256k1Curve>(&hp).unwrap();
        assert_eq!(p, back);
    }
}
