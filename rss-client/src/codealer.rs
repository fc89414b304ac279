//! The client's own hierarchical-sharing contribution.
//!
//! In both `refresh` and `import`, the client acts as one additional
//! co-dealer alongside the server committee: it generates a master and a
//! server polynomial of its own, under a y-intercept chosen so that
//! aggregating it with the servers' contributions reconstructs the known
//! TSS public key (see the aggregator's consistency checks).

use rand::{CryptoRng, RngCore};
use rss_core::curve::{self, TssCurve};
use rss_core::poly::{self, Polynomial};
use rss_types::api::{RssRound1ResponseData, TargetEncryptions};
use rss_types::HexPoint;

use crate::Error;

/// Computes the client's Lagrange weight `L_client(t)` for a refresh call:
/// `Lagrange([1, inputIndex], inputIndex, 0) · Lagrange([0, 1], 0, t)`.
pub fn refresh_client_lagrange<C: TssCurve>(
    input_index: u8,
    target: u8,
) -> Result<C::Scalar, Error> {
    let one = C::Scalar::from(1u64);
    let zero = C::Scalar::from(0u64);
    let input_index_s = C::Scalar::from(u64::from(input_index));
    let target_s = C::Scalar::from(u64::from(target));

    let first = poly::lagrange_coeff(&[one, input_index_s], input_index_s, zero)?;
    let second = poly::lagrange_coeff(&[zero, one], zero, target_s)?;
    Ok(first * second)
}

/// Computes the client's Lagrange weight `L_client(t)` for an import call:
/// `Lagrange([0, 1], 0, t)`.
pub fn import_client_lagrange<C: TssCurve>(target: u8) -> Result<C::Scalar, Error> {
    let one = C::Scalar::from(1u64);
    let zero = C::Scalar::from(0u64);
    let target_s = C::Scalar::from(u64::from(target));
    Ok(poly::lagrange_coeff(&[zero, one], zero, target_s)?)
}

/// Generates the client's round-1 contribution for one target index.
///
/// `seed` is the scalar the client's master polynomial is ultimately
/// anchored to (`inputShare` for refresh, `importKey` for import); `l_client`
/// is its Lagrange weight for this target (see [`refresh_client_lagrange`] /
/// [`import_client_lagrange`]).
pub fn generate<C: TssCurve>(
    seed: C::Scalar,
    l_client: C::Scalar,
    server_threshold: usize,
    server_pub_keys: &[HexPoint],
    temp_pub_key_bytes: &[u8],
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<RssRound1ResponseData, Error> {
    let master_poly: Polynomial<C::Scalar> =
        poly::gen_poly(1, Some(l_client * seed), rng);
    let m1 = master_poly.eval(C::Scalar::from(1u64));

    let server_poly: Polynomial<C::Scalar> =
        poly::gen_poly(server_threshold.saturating_sub(1), Some(m1), rng);

    let master_poly_commits = master_poly
        .coeffs()
        .iter()
        .map(|&c| curve::point_to_hex::<C>(curve::commit::<C>(c)))
        .collect();
    let server_poly_commits = server_poly
        .coeffs()
        .iter()
        .map(|&c| curve::point_to_hex::<C>(curve::commit::<C>(c)))
        .collect();

    let user_share = master_poly.eval(C::Scalar::from(rss_types::USER_SHARE_INDEX));
    let user_enc = rss_crypto::encrypt(
        temp_pub_key_bytes,
        &curve::field_to_be_bytes(user_share),
    )?;

    let mut server_encs = Vec::with_capacity(server_pub_keys.len());
    for (j, server_pub) in server_pub_keys.iter().enumerate() {
        let share = server_poly.eval(C::Scalar::from(u64::try_from(j + 1).unwrap()));
        let pub_bytes = crate::util::hex_point_to_uncompressed(server_pub)?;
        server_encs.push(rss_crypto::encrypt(
            &pub_bytes,
            &curve::field_to_be_bytes(share),
        )?);
    }

    Ok(RssRound1ResponseData {
        master_poly_commits,
        server_poly_commits,
        target_encryptions: TargetEncryptions {
            user_enc,
            server_encs,
        },
    })
}
