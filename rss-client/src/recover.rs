//! Share recovery (C6): reconstructing a user's refreshed TSS share from
//! factor-key-encrypted ciphertexts, without ever contacting the server
//! committee.

use rss_core::curve::{self, TssCurve};
use rss_core::poly;
use rss_types::EncryptedMessage;

use crate::Error;

/// Arguments to [`recover`].
pub struct RecoverOpts<'a> {
    /// The factor private key (secp256k1, 32 bytes) to decrypt with.
    pub factor_key: &'a [u8],
    /// The client's own factor-encrypted share of the master polynomial.
    pub user_enc: &'a EncryptedMessage,
    /// Server-side factor-encrypted shares, indexed `0..N`; `None` for
    /// servers whose ciphertext was not supplied.
    pub server_encs: &'a [Option<EncryptedMessage>],
    /// 1-based indices of the servers to reconstruct from; must have at
    /// least `T` entries present in `server_encs`.
    pub selected_servers: &'a [u16],
}

/// Recovers the refreshed TSS share as 32-byte big-endian scalar bytes.
///
/// Silently skips any `selected_servers` entry whose `server_encs` slot is
/// `None` (the caller is expected to have supplied sparse input
/// deliberately); a present-but-undecryptable ciphertext is a hard error.
pub fn recover<C: TssCurve>(opts: RecoverOpts<'_>) -> Result<[u8; 32], Error> {
    let user_bytes = rss_crypto::decrypt(opts.factor_key, opts.user_enc)?;
    let u = curve::field_from_be_bytes::<C::Scalar>(&user_bytes);

    let selected_scalars: Vec<C::Scalar> = opts
        .selected_servers
        .iter()
        .map(|&j| C::Scalar::from(u64::from(j)))
        .collect();

    let mut server_recon = C::Scalar::from(0u64);
    for &j in opts.selected_servers {
        let idx = usize::from(j) - 1;
        let Some(enc) = opts.server_encs.get(idx).and_then(|e| e.as_ref()) else {
            continue;
        };
        let bytes = rss_crypto::decrypt(opts.factor_key, enc)?;
        let share = curve::field_from_be_bytes::<C::Scalar>(&bytes);
        let coeff = poly::lagrange_coeff(
            &selected_scalars,
            C::Scalar::from(u64::from(j)),
            C::Scalar::from(0u64),
        )?;
        server_recon += share * coeff;
    }

    let one = C::Scalar::from(1u64);
    let ninety_nine = C::Scalar::from(rss_types::USER_SHARE_INDEX);
    let zero = C::Scalar::from(0u64);
    let l_user = poly::lagrange_coeff(&[one, ninety_nine], ninety_nine, zero)?;
    let l_server = poly::lagrange_coeff(&[one, ninety_nine], one, zero)?;

    let tss_share = u * l_user + server_recon * l_server;
    let bytes = curve::field_to_be_bytes(tss_share);
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_secp256k1::Fr;
    use k256::elliptic_curve::sec1::ToEncodedPoint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use rss_core::curve::Secp256k1Curve;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(13)
    }

    fn factor_keypair(rng: &mut ChaCha20Rng) -> ([u8; 32], Vec<u8>) {
        let secret = k256::SecretKey::random(rng);
        let mut priv_bytes = [0u8; 32];
        priv_bytes.copy_from_slice(&secret.to_bytes());
        let pub_bytes = secret.public_key().to_encoded_point(false).as_bytes().to_vec();
        (priv_bytes, pub_bytes)
    }

    #[test]
    fn reconstructs_known_tss_share() {
        let mut rng = rng();
        let (factor_priv, factor_pub) = factor_keypair(&mut rng);

        let tss_share = Fr::rand(&mut rng);
        let one = Fr::from(1u64);
        let ninety_nine = Fr::from(rss_types::USER_SHARE_INDEX);
        let zero = Fr::from(0u64);

        // Pick u, server_recon as two points on the line through
        // (1, server_recon) and (99, u) whose interpolation at 0 is
        // tss_share, mirroring how recover() weights them.
        let u = Fr::rand(&mut rng);
        let l_user = poly::lagrange_coeff(&[one, ninety_nine], ninety_nine, zero).unwrap();
        let l_server = poly::lagrange_coeff(&[one, ninety_nine], one, zero).unwrap();
        let server_recon = (tss_share - u * l_user) * curve::try_invert(l_server).unwrap();

        let user_enc =
            rss_crypto::encrypt(&factor_pub, &curve::field_to_be_bytes(u)).unwrap();
        // A single selected server (index 1) holding the full server_recon
        // value, so its own Lagrange weight at target 0 is 1.
        let server_enc =
            rss_crypto::encrypt(&factor_pub, &curve::field_to_be_bytes(server_recon)).unwrap();

        let recovered = recover::<Secp256k1Curve>(RecoverOpts {
            factor_key: &factor_priv,
            user_enc: &user_enc,
            server_encs: &[Some(server_enc)],
            selected_servers: &[1],
        })
        .unwrap();

        assert_eq!(recovered.as_slice(), curve::field_to_be_bytes::<Fr>(tss_share).as_slice());
    }

    #[test]
    fn missing_server_slot_is_skipped_not_errored() {
        let mut rng = rng();
        let (factor_priv, factor_pub) = factor_keypair(&mut rng);
        let user_enc =
            rss_crypto::encrypt(&factor_pub, &curve::field_to_be_bytes(Fr::rand(&mut rng)))
                .unwrap();

        // selected_servers names a server with no corresponding entry in
        // server_encs; recover() must not treat that as an error.
        let result = recover::<Secp256k1Curve>(RecoverOpts {
            factor_key: &factor_priv,
            user_enc: &user_enc,
            server_encs: &[],
            selected_servers: &[1],
        });
        assert!(result.is_ok());
    }
}
