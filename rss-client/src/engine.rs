//! The RSS client engine (C5): drives round 1 and round 2 against the
//! server committee, acts as the extra co-dealer, and produces
//! factor-encrypted output shares.

use std::marker::PhantomData;

use ark_ec::{AffineRepr, CurveGroup};
use rand::rngs::OsRng;
use rss_core::curve::{self, TssCurve};
use rss_types::api::{
    RefreshResponse, RssRound1ResponseData, RssRound2RequestData, ServersInfo,
};
use rss_types::HexPoint;

use crate::codealer;
use crate::config::RssClientConfig;
use crate::opts::{ImportOpts, RefreshOpts};
use crate::rounds::{self, Round1Plan};
use crate::transport::Endpoint;
use crate::util::hex_point_to_uncompressed;
use crate::Error;

/// A client bound to a specific TSS curve.
///
/// Constructed via [`crate::AnyRssClient::new`], which picks the concrete
/// curve from [`RssClientConfig::key_type`](crate::config::RssClientConfig).
pub struct RssClient<C: TssCurve> {
    config: RssClientConfig,
    _curve: PhantomData<C>,
}

/// An ephemeral secp256k1 keypair, generated once per client instance and
/// discarded at the end of the call (or on cancellation).
struct TempKeypair {
    priv_bytes: [u8; 32],
    pub_bytes: Vec<u8>,
}

impl TempKeypair {
    fn new(override_bytes: Option<[u8; 32]>) -> Self {
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        let secret = match override_bytes {
            Some(bytes) => k256::SecretKey::from_slice(&bytes)
                .expect("configured temp_key must be a valid secp256k1 scalar"),
            None => k256::SecretKey::random(&mut OsRng),
        };
        let pub_bytes = secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        let mut priv_bytes = [0u8; 32];
        priv_bytes.copy_from_slice(&secret.to_bytes());
        Self {
            priv_bytes,
            pub_bytes,
        }
    }

    fn pub_hex_point(&self) -> HexPoint {
        HexPoint::from_coordinates(&self.pub_bytes[1..33], &self.pub_bytes[33..65])
    }
}

impl<C: TssCurve> RssClient<C> {
    /// Builds a client from the given configuration. Validates that the
    /// endpoint and public-key lists agree in length and that the threshold
    /// does not exceed the committee size.
    pub fn new(config: RssClientConfig) -> Result<Self, Error> {
        config.validate_shape()?;
        Ok(Self {
            config,
            _curve: PhantomData,
        })
    }

    fn servers_info(&self, selected: Vec<u16>) -> ServersInfo {
        ServersInfo {
            pubkeys: self.config.server_pub_keys.clone(),
            threshold: self.config.server_threshold,
            selected,
        }
    }

    /// Refreshes the server-side sub-sharing for every target index,
    /// producing one [`RefreshResponse`] per target.
    pub async fn refresh(&self, opts: RefreshOpts) -> Result<Vec<RefreshResponse>, Error> {
        if opts.factor_pubs.len() != opts.target_indexes.len() {
            return Err(Error::InputInvariant(format!(
                "factor_pubs has {} entries but target_indexes has {}",
                opts.factor_pubs.len(),
                opts.target_indexes.len()
            )));
        }
        if !(2..=3).contains(&opts.input_index) {
            return Err(Error::InputInvariant(format!(
                "input_index must be 2 or 3, got {}",
                opts.input_index
            )));
        }

        let temp_key = TempKeypair::new(self.config.temp_key);
        let servers_info = self.servers_info(opts.selected_servers.clone());
        let temp_pub_hex = temp_key.pub_hex_point();

        let plan = Round1Plan {
            old: Some((opts.old_label.as_str(), &servers_info, opts.input_index)),
            new: (opts.new_label.as_str(), &servers_info),
            sigs: &opts.sigs,
            user_temp_pubkey: &temp_pub_hex,
            target_index: &opts.target_indexes,
            key_type: rss_types_key_type::<C>(),
        };
        let responses =
            rounds::dispatch_round1(&self.config.server_endpoints, &opts.selected_servers, &plan)
                .await?;

        let input_share = curve::field_from_be_bytes::<C::Scalar>(&opts.input_share);
        let dkg_new_pub = curve::hex_to_point::<C>(&opts.dkg_new_pub)?;

        let mut client_contributions = Vec::with_capacity(opts.target_indexes.len());
        for &target in &opts.target_indexes {
            let l_client = codealer::refresh_client_lagrange::<C>(opts.input_index, target)?;
            let contribution = codealer::generate::<C>(
                input_share,
                l_client,
                usize::from(self.config.server_threshold),
                &self.config.server_pub_keys,
                &temp_key.pub_bytes,
                &mut OsRng,
            )?;
            client_contributions.push(contribution);
        }

        self.finish(
            opts.target_indexes,
            responses,
            client_contributions,
            &temp_key,
            dkg_new_pub,
            opts.factor_pubs,
        )
        .await
    }

    /// Imports an externally generated secret, producing one
    /// [`RefreshResponse`] per target index.
    pub async fn import(&self, opts: ImportOpts) -> Result<Vec<RefreshResponse>, Error> {
        if opts.factor_pubs.len() != opts.target_indexes.len() {
            return Err(Error::InputInvariant(format!(
                "factor_pubs has {} entries but target_indexes has {}",
                opts.factor_pubs.len(),
                opts.target_indexes.len()
            )));
        }

        let temp_key = TempKeypair::new(self.config.temp_key);
        let servers_info = self.servers_info(opts.selected_servers.clone());

        let temp_pub_hex = temp_key.pub_hex_point();
        let plan = Round1Plan {
            old: None,
            new: (opts.new_label.as_str(), &servers_info),
            sigs: &opts.sigs,
            user_temp_pubkey: &temp_pub_hex,
            target_index: &opts.target_indexes,
            key_type: rss_types_key_type::<C>(),
        };
        let responses =
            rounds::dispatch_round1(&self.config.server_endpoints, &opts.selected_servers, &plan)
                .await?;

        let import_key = curve::field_from_be_bytes::<C::Scalar>(&opts.import_key);
        let dkg_new_pub = curve::hex_to_point::<C>(&opts.dkg_new_pub)?;

        let mut client_contributions = Vec::with_capacity(opts.target_indexes.len());
        for &target in &opts.target_indexes {
            let l_client = codealer::import_client_lagrange::<C>(target)?;
            let contribution = codealer::generate::<C>(
                import_key,
                l_client,
                usize::from(self.config.server_threshold),
                &self.config.server_pub_keys,
                &temp_key.pub_bytes,
                &mut OsRng,
            )?;
            client_contributions.push(contribution);
        }

        self.finish(
            opts.target_indexes,
            responses,
            client_contributions,
            &temp_key,
            dkg_new_pub,
            opts.factor_pubs,
        )
        .await
    }

    /// Shared tail of `refresh`/`import`: aggregate, verify, decrypt,
    /// transpose, dispatch round 2, and assemble the response.
    async fn finish(
        &self,
        target_indexes: Vec<u8>,
        round1_responses: Vec<rss_types::api::RssRound1Response>,
        client_contributions: Vec<RssRound1ResponseData>,
        temp_key: &TempKeypair,
        dkg_new_pub: C::Affine,
        factor_pubs: Vec<HexPoint>,
    ) -> Result<Vec<RefreshResponse>, Error> {
        let tss_pub_key = curve::hex_to_point::<C>(&self.config.tss_pub_key)?;
        let server_threshold = usize::from(self.config.server_threshold);
        let server_count = self.config.server_count();

        // `all_per_target[t]` gathers every co-dealer's contribution for
        // target_indexes[t]: the server responses for that target index,
        // across every co-dealer request, plus the client's own.
        let mut all_per_target: Vec<Vec<RssRound1ResponseData>> =
            vec![Vec::new(); target_indexes.len()];
        for response in &round1_responses {
            for (t_pos, &target) in response.target_index.iter().enumerate() {
                if let Some(out_pos) = target_indexes.iter().position(|&t| t == target) {
                    all_per_target[out_pos].push(response.data[t_pos].clone());
                }
            }
        }
        for (out_pos, contribution) in client_contributions.into_iter().enumerate() {
            all_per_target[out_pos].push(contribution);
        }

        let mut round2_columns: Vec<Vec<RssRound2RequestData>> =
            (0..server_count).map(|_| Vec::with_capacity(target_indexes.len())).collect();
        let mut user_factor_encs = Vec::with_capacity(target_indexes.len());

        for (t_pos, &target) in target_indexes.iter().enumerate() {
            let codealers = &all_per_target[t_pos];
            let aggregated = crate::aggregator::aggregate_target::<C>(
                codealers,
                server_threshold,
                target,
                dkg_new_pub,
                tss_pub_key,
            )?;

            let mut user_share = C::Scalar::from(0u64);
            for codealer in codealers {
                let bytes = rss_crypto::decrypt(
                    &temp_key.priv_bytes,
                    &codealer.target_encryptions.user_enc,
                )?;
                user_share += curve::field_from_be_bytes::<C::Scalar>(&bytes);
            }

            let expected = curve::add_affine::<C>(
                aggregated.master_commits[0],
                (aggregated.master_commits[1].into_group()
                    * C::Scalar::from(rss_types::USER_SHARE_INDEX))
                .into_affine(),
            );
            if curve::commit::<C>(user_share) != expected {
                return Err(Error::ShareConsistency);
            }

            let factor_pub_bytes = hex_point_to_uncompressed(&factor_pubs[t_pos])?;
            let user_factor_enc = rss_crypto::encrypt(
                &factor_pub_bytes,
                &curve::field_to_be_bytes(user_share),
            )?;
            user_factor_encs.push(user_factor_enc);

            let master_commits_hex = aggregated
                .master_commits
                .iter()
                .map(|&p| curve::point_to_hex::<C>(p))
                .collect::<Vec<_>>();
            let server_commits_hex = aggregated
                .server_commits
                .iter()
                .map(|&p| curve::point_to_hex::<C>(p))
                .collect::<Vec<_>>();

            for server_idx in 0..server_count {
                let column: Vec<_> = codealers
                    .iter()
                    .map(|c| c.target_encryptions.server_encs[server_idx].clone())
                    .collect();
                round2_columns[server_idx].push(RssRound2RequestData {
                    master_commits: master_commits_hex.clone(),
                    server_commits: server_commits_hex.clone(),
                    server_encs: column,
                    factor_pubkeys: vec![factor_pubs[t_pos].clone()],
                });
            }
        }

        let round2_responses = rounds::dispatch_round2(
            &self.config.server_endpoints,
            &target_indexes,
            &round2_columns,
            rss_types_key_type::<C>(),
        )
        .await;

        let usable = round2_responses.iter().filter(|r| r.is_some()).count();
        if usable < server_threshold {
            return Err(Error::Availability {
                needed: self.config.server_threshold,
                got: u16::try_from(usable).unwrap_or(u16::MAX),
            });
        }

        let mut outputs = Vec::with_capacity(target_indexes.len());
        for (t_pos, &target) in target_indexes.iter().enumerate() {
            let mut server_factor_encs = Vec::with_capacity(server_count);
            for response in &round2_responses {
                let enc = response
                    .as_ref()
                    .and_then(|r| r.data.get(t_pos))
                    .and_then(|d| d.encs.first())
                    .cloned();
                server_factor_encs.push(enc);
            }
            outputs.push(RefreshResponse {
                target_index: target,
                factor_pub: factor_pubs[t_pos].clone(),
                server_factor_encs,
                user_factor_enc: user_factor_encs[t_pos].clone(),
            });
        }
        Ok(outputs)
    }
}

fn rss_types_key_type<C: TssCurve>() -> rss_types::KeyType {
    match C::name() {
        "secp256k1" => rss_types::KeyType::Secp256k1,
        "ed25519" => rss_types::KeyType::Ed25519,
        other => unreachable!("unsupported curve adapter: {other}"),
    }
}
