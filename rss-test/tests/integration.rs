//! End-to-end exercises of the refresh secret sharing protocol against an
//! in-process mock committee.

use std::sync::Arc;

use async_trait::async_trait;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rss_client::transport::{Endpoint, ServerEndpoint, TransportError};
use rss_client::{
    recover_share, Ed25519Curve, Error as ClientError, ImportOpts, RecoverOpts, RefreshOpts,
    RssClient, RssClientConfig, Secp256k1Curve,
};
use rss_core::curve;
use rss_core::poly;
use rss_test::committee::Committee;
use rss_test::{fixture, MockEndpoint};
use rss_types::{HexPoint, KeyType};
use serde_json::Value;

fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(20260727)
}

/// A secp256k1 keypair plus its uncompressed public key, for use as a factor
/// key (recovery-side) or as `dkg_new_pub`'s matching private half.
struct Secp256k1Keypair {
    priv_bytes: [u8; 32],
    pub_point: HexPoint,
}

fn gen_secp256k1_keypair(rng: &mut ChaCha20Rng) -> Secp256k1Keypair {
    let secret = k256::SecretKey::random(rng);
    let mut priv_bytes = [0u8; 32];
    priv_bytes.copy_from_slice(&secret.to_bytes());
    let encoded = secret.public_key().to_encoded_point(false);
    let pub_point =
        HexPoint::from_coordinates(encoded.x().expect("has x"), encoded.y().expect("has y"));
    Secp256k1Keypair {
        priv_bytes,
        pub_point,
    }
}

/// Checks that `recovered` is the correct refreshed share for `target`:
/// combined with `dkg_new_priv` via the protocol's `{1, target}` Lagrange
/// weights, it must reconstruct `tss_priv_key`.
fn assert_recovers_tss_priv_key<C: rss_core::curve::TssCurve>(
    recovered: &[u8; 32],
    target: u8,
    dkg_new_priv: C::Scalar,
    tss_priv_key: C::Scalar,
) {
    let one = C::Scalar::from(1u64);
    let zero = C::Scalar::from(0u64);
    let t = C::Scalar::from(u64::from(target));
    let indices = [one, t];
    let eta1 = poly::lagrange_coeff(&indices, one, zero).unwrap();
    let eta2 = poly::lagrange_coeff(&indices, t, zero).unwrap();
    let recovered_scalar = curve::field_from_be_bytes::<C::Scalar>(recovered);
    assert_eq!(eta1 * dkg_new_priv + eta2 * recovered_scalar, tss_priv_key);
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_round_trip_secp256k1() {
    let mut rng = rng();
    let committee = Committee::new(5);
    let selected: Vec<u16> = vec![1, 2, 3];
    let target = 2u8;
    let input_index = 2u8;

    let f = fixture::build_refresh_fixture::<Secp256k1Curve>(
        &committee.nodes,
        &selected,
        3,
        target,
        input_index,
        "old-session",
        "new-session",
        &mut rng,
    );
    let factor = gen_secp256k1_keypair(&mut rng);

    let config = RssClientConfig {
        tss_pub_key: f.tss_pub_key.clone(),
        server_endpoints: committee.server_endpoints,
        server_threshold: 3,
        server_pub_keys: committee.server_pub_keys,
        key_type: KeyType::Secp256k1,
        temp_key: None,
    };
    let client = RssClient::<Secp256k1Curve>::new(config).unwrap();

    let opts = RefreshOpts {
        old_label: "old-session".into(),
        new_label: "new-session".into(),
        sigs: vec![],
        dkg_new_pub: f.dkg_new_pub,
        input_share: f.input_share,
        input_index: f.input_index,
        target_indexes: vec![target],
        selected_servers: selected.clone(),
        factor_pubs: vec![factor.pub_point.clone()],
    };
    let responses = client.refresh(opts).await.unwrap();
    assert_eq!(responses.len(), 1);
    let response = &responses[0];
    assert_eq!(response.target_index, target);
    assert_eq!(
        response.server_factor_encs.iter().filter(|e| e.is_some()).count(),
        5
    );

    let recovered = recover_share::<Secp256k1Curve>(RecoverOpts {
        factor_key: &factor.priv_bytes,
        user_enc: &response.user_factor_enc,
        server_encs: &response.server_factor_encs,
        selected_servers: &[1, 2, 3],
    })
    .unwrap();

    assert_recovers_tss_priv_key::<Secp256k1Curve>(
        &recovered,
        target,
        f.dkg_new_priv,
        f.tss_priv_key,
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn import_round_trip_ed25519() {
    let mut rng = rng();
    let committee = Committee::new(4);
    let selected: Vec<u16> = vec![1, 2, 3];
    let target = 3u8;

    let f = fixture::build_import_fixture::<Ed25519Curve>(
        &committee.nodes,
        &selected,
        3,
        target,
        "imported-session",
        &mut rng,
    );
    let factor = gen_secp256k1_keypair(&mut rng);

    let config = RssClientConfig {
        tss_pub_key: f.tss_pub_key.clone(),
        server_endpoints: committee.server_endpoints,
        server_threshold: 3,
        server_pub_keys: committee.server_pub_keys,
        key_type: KeyType::Ed25519,
        temp_key: None,
    };
    let client = RssClient::<Ed25519Curve>::new(config).unwrap();

    let opts = ImportOpts {
        new_label: "imported-session".into(),
        sigs: vec![],
        dkg_new_pub: f.dkg_new_pub,
        import_key: f.import_key,
        target_indexes: vec![target],
        selected_servers: selected.clone(),
        factor_pubs: vec![factor.pub_point.clone()],
    };
    let responses = client.import(opts).await.unwrap();
    let response = &responses[0];

    let recovered = recover_share::<Ed25519Curve>(RecoverOpts {
        factor_key: &factor.priv_bytes,
        user_enc: &response.user_factor_enc,
        server_encs: &response.server_factor_encs,
        selected_servers: &[1, 2, 3],
    })
    .unwrap();

    assert_recovers_tss_priv_key::<Ed25519Curve>(
        &recovered,
        target,
        f.dkg_new_priv,
        f.tss_priv_key,
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn tampered_dkg_pub_is_rejected() {
    let mut rng = rng();
    let committee = Committee::new(5);
    let selected: Vec<u16> = vec![1, 2, 3];
    let target = 2u8;

    let f = fixture::build_refresh_fixture::<Secp256k1Curve>(
        &committee.nodes,
        &selected,
        3,
        target,
        2,
        "old-session",
        "new-session",
        &mut rng,
    );
    let factor = gen_secp256k1_keypair(&mut rng);

    // Swap in an unrelated dkg_new_pub: the round-1 aggregate commitments no
    // longer reconstruct tss_pub_key against it.
    let bogus_dkg_new_pub =
        curve::point_to_hex::<Secp256k1Curve>(curve::commit::<Secp256k1Curve>(
            curve::random_nonzero_scalar(&mut rng),
        ));

    let config = RssClientConfig {
        tss_pub_key: f.tss_pub_key,
        server_endpoints: committee.server_endpoints,
        server_threshold: 3,
        server_pub_keys: committee.server_pub_keys,
        key_type: KeyType::Secp256k1,
        temp_key: None,
    };
    let client = RssClient::<Secp256k1Curve>::new(config).unwrap();

    let opts = RefreshOpts {
        old_label: "old-session".into(),
        new_label: "new-session".into(),
        sigs: vec![],
        dkg_new_pub: bogus_dkg_new_pub,
        input_share: f.input_share,
        input_index: f.input_index,
        target_indexes: vec![target],
        selected_servers: selected.clone(),
        factor_pubs: vec![factor.pub_point],
    };

    let err = client.refresh(opts).await.unwrap_err();
    assert!(matches!(err, ClientError::CommitConsistency(_)));
}

/// An endpoint that behaves normally for round 1 but reports every server
/// offline for round 2, to drive the client below the availability floor.
struct FlakyRound2 {
    inner: MockEndpoint,
}

#[async_trait]
impl Endpoint for FlakyRound2 {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        self.inner.get(path).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        if path == "/rss_round_2" {
            return Err(TransportError::Mock("server offline".into()));
        }
        self.inner.post(path, body).await
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn below_availability_floor_is_rejected() {
    let mut rng = rng();
    let committee = Committee::new(5);
    let selected: Vec<u16> = vec![1, 2, 3];
    let target = 2u8;

    let f = fixture::build_refresh_fixture::<Secp256k1Curve>(
        &committee.nodes,
        &selected,
        3,
        target,
        2,
        "old-session",
        "new-session",
        &mut rng,
    );
    let factor = gen_secp256k1_keypair(&mut rng);

    // Only nodes 1 and 2 will answer round 2; that is one short of the
    // threshold of 3, regardless of how round 1 went.
    let server_endpoints: Vec<ServerEndpoint> = committee
        .nodes
        .iter()
        .map(|node| {
            let endpoint = MockEndpoint::new(node);
            if node.index() <= 2 {
                ServerEndpoint::mock(Arc::new(endpoint))
            } else {
                ServerEndpoint::mock(Arc::new(FlakyRound2 { inner: endpoint }))
            }
        })
        .collect();

    let config = RssClientConfig {
        tss_pub_key: f.tss_pub_key,
        server_endpoints,
        server_threshold: 3,
        server_pub_keys: committee.server_pub_keys,
        key_type: KeyType::Secp256k1,
        temp_key: None,
    };
    let client = RssClient::<Secp256k1Curve>::new(config).unwrap();

    let opts = RefreshOpts {
        old_label: "old-session".into(),
        new_label: "new-session".into(),
        sigs: vec![],
        dkg_new_pub: f.dkg_new_pub,
        input_share: f.input_share,
        input_index: f.input_index,
        target_indexes: vec![target],
        selected_servers: selected.clone(),
        factor_pubs: vec![factor.pub_point],
    };

    let err = client.refresh(opts).await.unwrap_err();
    match err {
        ClientError::Availability { needed, got } => {
            assert_eq!(needed, 3);
            assert_eq!(got, 2);
        }
        other => panic!("expected Availability error, got {other:?}"),
    }
}
