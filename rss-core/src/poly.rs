//! Polynomial generation, evaluation, and Lagrange interpolation over a
//! prime scalar field.
//!
//! Everything here is generic over [`PrimeField`]; it has no notion of
//! curves or points, only the `ℤ_n` arithmetic the Feldman/Shamir machinery
//! is built from. Field subtraction already wraps modulo `n`, so unlike a
//! big-integer library there is no separate `umod` step for negative
//! numerators.

use ark_ff::{PrimeField, UniformRand, Zero};
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use zeroize::Zeroize;

/// Errors raised by the polynomial kit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolyError {
    /// A Lagrange coefficient was requested with `my_index` equal to one of
    /// the other indices, making the denominator zero. Indicates a caller
    /// bug (duplicate index in the index set).
    #[error("zero denominator while computing a lagrange coefficient")]
    ZeroDenominator,
    /// The two operand slices of a length-sensitive operation (dot product)
    /// did not match.
    #[error("length mismatch: {a} vs {b}")]
    LengthMismatch {
        /// Length of the first operand.
        a: usize,
        /// Length of the second operand.
        b: usize,
    },
}

/// A dense polynomial `P(x) = Σ coeffs[i]·xⁱ`, stored lowest-degree first.
///
/// Coefficients are zeroized on drop: `coeffs[0]` (and, for a master
/// polynomial, every coefficient) is secret share material.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Polynomial<F: PrimeField>(Vec<F>);

impl<F: PrimeField> Polynomial<F> {
    /// Wraps an explicit coefficient vector.
    pub fn from_coeffs(coeffs: Vec<F>) -> Self {
        Self(coeffs)
    }

    /// The polynomial's coefficients, lowest-degree first.
    pub fn coeffs(&self) -> &[F] {
        &self.0
    }

    /// The polynomial's degree (`len - 1`).
    pub fn degree(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Evaluates `P(x)` via Horner's method.
    pub fn eval(&self, x: F) -> F {
        eval(&self.0, x)
    }
}

/// Generates a random polynomial of the given `degree` with the given
/// `y_intercept` fixed as `coeffs[0]`.
///
/// If `y_intercept` is `None`, `coeffs[0]` is also drawn at random; the core
/// protocol always supplies a concrete intercept; the random-intercept case
/// exists for tests.
pub fn gen_poly<F: PrimeField>(
    degree: usize,
    y_intercept: Option<F>,
    rng: &mut (impl RngCore + CryptoRng),
) -> Polynomial<F> {
    let mut coeffs = Vec::with_capacity(degree + 1);
    coeffs.push(y_intercept.unwrap_or_else(|| F::rand(rng)));
    for _ in 0..degree {
        coeffs.push(F::rand(rng));
    }
    Polynomial(coeffs)
}

/// Evaluates `Σ coeffs[i]·xⁱ mod n` via Horner's method, reducing after
/// every step.
pub fn eval<F: PrimeField>(coeffs: &[F], x: F) -> F {
    coeffs
        .iter()
        .rev()
        .fold(F::zero(), |acc, &coeff| acc * x + coeff)
}

/// Computes the Lagrange basis coefficient
/// `Π_{j≠my} (target - indices[j]) / (myIndex - indices[j])`
/// for reconstructing (or re-sharing to) `target` from a set of shares at
/// `indices`, where this share sits at `my_index`.
///
/// `target = 0` performs plain Shamir reconstruction; any other `target`
/// produces re-sharing coefficients that translate a share at `x = 1` into
/// one at `x = target`.
pub fn lagrange_coeff<F: PrimeField>(
    indices: &[F],
    my_index: F,
    target: F,
) -> Result<F, PolyError> {
    let mut numerator = F::one();
    let mut denominator = F::one();
    for &index in indices {
        if index == my_index {
            continue;
        }
        numerator *= target - index;
        denominator *= my_index - index;
    }
    let inv = crate::curve::try_invert(denominator).ok_or(PolyError::ZeroDenominator)?;
    Ok(numerator * inv)
}

/// A single-term convenience wrapper over [`lagrange_coeff`], matching the
/// two-element index sets (`[1, t]`, `[0, 1]`, …) the refresh protocol uses
/// throughout.
pub fn lagrange_coeff_2<F: PrimeField>(
    indices: [F; 2],
    my_index: F,
    target: F,
) -> Result<F, PolyError> {
    lagrange_coeff(&indices, my_index, target)
}

/// Computes `Σ a[i]·b[i] mod n`, failing if the operand lengths differ.
pub fn dot_product<F: PrimeField>(a: &[F], b: &[F]) -> Result<F, PolyError> {
    if a.len() != b.len() {
        return Err(PolyError::LengthMismatch {
            a: a.len(),
            b: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b.iter())
        .fold(F::zero(), |acc, (&x, &y)| acc + x * y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_secp256k1::Fr;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(7)
    }

    #[test]
    fn eval_at_zero_is_intercept() {
        let mut rng = rng();
        let intercept = Fr::rand(&mut rng);
        let poly = gen_poly(3, Some(intercept), &mut rng);
        assert_eq!(poly.eval(Fr::from(0u64)), intercept);
    }

    #[test]
    fn lagrange_reconstructs_shamir_share() {
        let mut rng = rng();
        let secret = Fr::rand(&mut rng);
        let poly = gen_poly(2, Some(secret), &mut rng);
        let xs: Vec<Fr> = (1..=3u64).map(Fr::from).collect();
        let shares: Vec<Fr> = xs.iter().map(|&x| poly.eval(x)).collect();

        let mut reconstructed = Fr::from(0u64);
        for (i, &xi) in xs.iter().enumerate() {
            let coeff = lagrange_coeff(&xs, xi, Fr::from(0u64)).unwrap();
            reconstructed += shares[i] * coeff;
        }
        assert_eq!(reconstructed, secret);
    }

    #[test]
    fn duplicate_index_is_zero_denominator() {
        let xs = [Fr::from(1u64), Fr::from(1u64)];
        assert_eq!(
            lagrange_coeff(&xs, Fr::from(1u64), Fr::from(0u64)),
            Err(PolyError::ZeroDenominator)
        );
    }

    #[test]
    fn dot_product_checks_length() {
        let a = [Fr::from(1u64), Fr::from(2u64)];
        let b = [Fr::from(1u64)];
        assert_eq!(
            dot_product(&a, &b),
            Err(PolyError::LengthMismatch { a: 2, b: 1 })
        );
    }
}
