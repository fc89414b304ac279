//! Commitment aggregation and the round-1 algebraic consistency checks (C4).

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use rss_core::curve::{self, TssCurve};
use rss_core::poly;
use rss_types::api::RssRound1ResponseData;

use crate::Error;

/// The summed Feldman commitments for one target index, plus the values
/// they were checked against.
pub struct AggregatedCommitments<C: TssCurve> {
    /// `mc[0], mc[1]`: summed master-polynomial commitments.
    pub master_commits: [C::Affine; 2],
    /// `sc[0..T-1]`: summed server-polynomial commitments.
    pub server_commits: Vec<C::Affine>,
}

/// Aggregates every co-dealer's round-1 contribution for a single target
/// index `t`, and verifies the two algebraic identities binding them to the
/// known TSS public key.
///
/// `responses` must already be the per-target slice (one [`RssRound1ResponseData`]
/// per co-dealer: `2T+1` for refresh, `T+1` for import).
pub fn aggregate_target<C: TssCurve>(
    responses: &[RssRound1ResponseData],
    server_poly_degree_plus_one: usize,
    target: u8,
    dkg_new_pub: C::Affine,
    tss_pub_key: C::Affine,
) -> Result<AggregatedCommitments<C>, Error> {
    for response in responses {
        if response.master_poly_commits.len() != 2 {
            return Err(Error::CommitShape(format!(
                "master_poly_commits has {} entries, expected 2",
                response.master_poly_commits.len()
            )));
        }
        if response.server_poly_commits.len() != server_poly_degree_plus_one {
            return Err(Error::CommitShape(format!(
                "server_poly_commits has {} entries, expected {}",
                response.server_poly_commits.len(),
                server_poly_degree_plus_one
            )));
        }
    }

    let mut master_commits = [C::Affine::zero(), C::Affine::zero()];
    for k in 0..2 {
        let points = responses
            .iter()
            .map(|r| curve::hex_to_point::<C>(&r.master_poly_commits[k]))
            .collect::<Result<Vec<_>, _>>()?;
        master_commits[k] = curve::sum_affine::<C>(points);
    }

    let mut server_commits = Vec::with_capacity(server_poly_degree_plus_one);
    for k in 0..server_poly_degree_plus_one {
        let points = responses
            .iter()
            .map(|r| curve::hex_to_point::<C>(&r.server_poly_commits[k]))
            .collect::<Result<Vec<_>, _>>()?;
        server_commits.push(curve::sum_affine::<C>(points));
    }

    let one = C::Scalar::from(1u64);
    let zero = C::Scalar::from(0u64);
    let t = C::Scalar::from(u64::from(target));
    let indices = [one, t];
    let eta1 = poly::lagrange_coeff(&indices, one, zero)?;
    let eta2 = poly::lagrange_coeff(&indices, t, zero)?;

    let lhs = curve::add_affine::<C>(
        (dkg_new_pub.into_group() * eta1).into_affine(),
        (master_commits[0].into_group() * eta2).into_affine(),
    );
    if lhs != tss_pub_key {
        return Err(Error::CommitConsistency(
            "eta1*dkgNewPub + eta2*mc[0] != tssPubKey".into(),
        ));
    }

    if curve::add_affine::<C>(master_commits[0], master_commits[1]) != server_commits[0] {
        return Err(Error::CommitConsistency(
            "mc[0] + mc[1] != sc[0]".into(),
        ));
    }

    Ok(AggregatedCommitments {
        master_commits,
        server_commits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_secp256k1::{Affine, Fr};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rss_core::curve::Secp256k1Curve;
    use rss_types::api::TargetEncryptions;
    use rss_types::EncryptedMessage;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(11)
    }

    fn empty_target_encryptions() -> TargetEncryptions {
        let placeholder = EncryptedMessage {
            ciphertext: String::new(),
            ephem_public_key: String::new(),
            iv: String::new(),
            mac: String::new(),
        };
        TargetEncryptions {
            user_enc: placeholder.clone(),
            server_encs: vec![],
        }
    }

    /// Builds a single co-dealer's round-1 contribution for `target`, given
    /// its master/server polynomials.
    fn contribution(
        master: &poly::Polynomial<Fr>,
        server: &poly::Polynomial<Fr>,
        server_poly_len: usize,
    ) -> RssRound1ResponseData {
        RssRound1ResponseData {
            master_poly_commits: master
                .coeffs()
                .iter()
                .map(|&c| curve::point_to_hex::<Secp256k1Curve>(curve::commit::<Secp256k1Curve>(c)))
                .collect(),
            server_poly_commits: server
                .coeffs()
                .iter()
                .take(server_poly_len)
                .map(|&c| curve::point_to_hex::<Secp256k1Curve>(curve::commit::<Secp256k1Curve>(c)))
                .collect(),
            target_encryptions: empty_target_encryptions(),
        }
    }

    #[test]
    fn accepts_self_consistent_single_dealer() {
        let mut rng = rng();
        let target = 2u8;
        let t = Fr::from(u64::from(target));

        let dkg_new_priv = Fr::rand(&mut rng);
        let eta1 = poly::lagrange_coeff(&[Fr::from(1u64), t], Fr::from(1u64), Fr::from(0u64)).unwrap();
        let eta2 = poly::lagrange_coeff(&[Fr::from(1u64), t], t, Fr::from(0u64)).unwrap();

        // Choose mc0 so eta1*dkgNewPriv + eta2*mc0 == tssPrivKey holds for a
        // freely chosen tssPrivKey.
        let tss_priv_key = Fr::rand(&mut rng);
        let mc0 = (tss_priv_key - eta1 * dkg_new_priv) * curve::try_invert(eta2).unwrap();

        let master = poly::gen_poly(1, Some(mc0), &mut rng);
        let m1 = master.eval(Fr::from(1u64));
        let server = poly::gen_poly(1, Some(m1), &mut rng);

        let response = contribution(&master, &server, 2);
        let dkg_new_pub: Affine = curve::commit::<Secp256k1Curve>(dkg_new_priv);
        let tss_pub_key: Affine = curve::commit::<Secp256k1Curve>(tss_priv_key);

        let aggregated =
            aggregate_target::<Secp256k1Curve>(&[response], 2, target, dkg_new_pub, tss_pub_key)
                .unwrap();
        assert_eq!(
            aggregated.master_commits[0],
            curve::commit::<Secp256k1Curve>(mc0)
        );
    }

    #[test]
    fn rejects_wrong_master_commit_shape() {
        let mut rng = rng();
        let master = poly::gen_poly(0, Some(Fr::rand(&mut rng)), &mut rng);
        let server = poly::gen_poly(1, None, &mut rng);
        let response = contribution(&master, &server, 2);

        let err = aggregate_target::<Secp256k1Curve>(
            &[response],
            2,
            2,
            Affine::zero(),
            Affine::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CommitShape(_)));
    }

    #[test]
    fn rejects_tss_pub_key_mismatch() {
        let mut rng = rng();
        let master = poly::gen_poly(1, Some(Fr::rand(&mut rng)), &mut rng);
        let m1 = master.eval(Fr::from(1u64));
        let server = poly::gen_poly(1, Some(m1), &mut rng);
        let response = contribution(&master, &server, 2);

        // An unrelated tss_pub_key cannot satisfy eta1*dkgNewPub + eta2*mc0.
        let err = aggregate_target::<Secp256k1Curve>(
            &[response],
            2,
            2,
            curve::commit::<Secp256k1Curve>(Fr::rand(&mut rng)),
            curve::commit::<Secp256k1Curve>(Fr::rand(&mut rng)),
        )
        .unwrap_err();
        assert!(matches!(err, Error::CommitConsistency(_)));
    }
}
