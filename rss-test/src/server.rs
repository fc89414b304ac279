//! A single mock committee member: the server-side half of the round-1 /
//! round-2 subprotocol. Exists purely to drive deterministic tests; it
//! enforces the same shape constraints the real servers are assumed to, but
//! never verifies `auth.sigs` (that hook is explicitly a pass-through).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rss_core::curve::{self, Ed25519Curve, Secp256k1Curve, TssCurve};
use rss_core::poly;
use rss_types::api::{
    RssRound1Request, RssRound1Response, RssRound1ResponseData, RssRound2Request,
    RssRound2Response, RssRound2ResponseData, TargetEncryptions,
};
use rss_types::{HexPoint, KeyType};
use serde::{Deserialize, Serialize};

use crate::error::MockError;

struct NodeState {
    index: u16,
    ecies_priv: RwLock<[u8; 32]>,
    tss_shares: RwLock<HashMap<String, [u8; 32]>>,
    nonce: RwLock<u64>,
}

/// One committee member, addressable over HTTP via [`MockNode::router`].
///
/// Cheap to clone: wraps an `Arc`, so every axum handler and every clone
/// shares the same ECIES key, registered TSS shares, and nonce counter.
#[derive(Clone)]
pub struct MockNode {
    state: Arc<NodeState>,
}

impl MockNode {
    /// Builds a fresh node at the given 1-based committee index, with a
    /// freshly generated ECIES keypair.
    pub fn new(index: u16) -> Self {
        let secret = k256::SecretKey::random(&mut OsRng);
        let mut priv_bytes = [0u8; 32];
        priv_bytes.copy_from_slice(&secret.to_bytes());
        Self {
            state: Arc::new(NodeState {
                index,
                ecies_priv: RwLock::new(priv_bytes),
                tss_shares: RwLock::new(HashMap::new()),
                nonce: RwLock::new(0),
            }),
        }
    }

    /// This node's 1-based committee index.
    pub fn index(&self) -> u16 {
        self.state.index
    }

    /// The node's current ECIES public key, as the uncompressed `HexPoint`
    /// every other party encrypts shares to.
    pub fn ecies_pub_key(&self) -> HexPoint {
        let priv_bytes = *self.state.ecies_priv.read().expect("lock poisoned");
        let secret = k256::SecretKey::from_slice(&priv_bytes).expect("stored key is valid");
        let encoded = secret.public_key().to_encoded_point(false);
        HexPoint::from_coordinates(
            encoded.x().expect("uncompressed point has x"),
            encoded.y().expect("uncompressed point has y"),
        )
    }

    /// Registers a TSS server share (32-byte big-endian scalar) under a
    /// session label, as the real DKG/reshare flow would populate it.
    pub fn set_tss_share(&self, label: impl Into<String>, share: [u8; 32]) {
        self.state
            .tss_shares
            .write()
            .expect("lock poisoned")
            .insert(label.into(), share);
    }

    /// Builds the axum [`Router`] serving this node's endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/rss_round_1", post(round1_handler))
            .route("/rss_round_2", post(round2_handler))
            .route("/private_key", post(set_private_key_handler))
            .route("/public_key", get(get_public_key_handler))
            .route("/tss_share", post(set_tss_share_handler))
            .route("/get_tss_nonce", get(get_nonce_handler))
            .route("/set_tss_nonce", post(set_nonce_handler))
            .with_state(self.clone())
    }
}

#[derive(Deserialize)]
struct SetPrivateKeyBody {
    private_key: String,
}

async fn set_private_key_handler(
    State(node): State<MockNode>,
    Json(body): Json<SetPrivateKeyBody>,
) -> Result<(), MockError> {
    let bytes = hex::decode(&body.private_key)
        .map_err(|e| MockError::BadRequest(format!("private_key is not valid hex: {e}")))?;
    if bytes.len() != 32 {
        return Err(MockError::BadRequest(
            "private_key must be 32 bytes".into(),
        ));
    }
    let mut priv_bytes = [0u8; 32];
    priv_bytes.copy_from_slice(&bytes);
    *node.state.ecies_priv.write().expect("lock poisoned") = priv_bytes;
    Ok(())
}

#[derive(Serialize)]
struct PublicKeyBody {
    pubkey: HexPoint,
}

async fn get_public_key_handler(State(node): State<MockNode>) -> Json<PublicKeyBody> {
    Json(PublicKeyBody {
        pubkey: node.ecies_pub_key(),
    })
}

#[derive(Deserialize)]
struct SetTssShareBody {
    label: String,
    share: String,
}

async fn set_tss_share_handler(
    State(node): State<MockNode>,
    Json(body): Json<SetTssShareBody>,
) -> Result<(), MockError> {
    let bytes = hex::decode(&body.share)
        .map_err(|e| MockError::BadRequest(format!("share is not valid hex: {e}")))?;
    let mut share = [0u8; 32];
    let start = share.len().saturating_sub(bytes.len());
    share[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(32)..]);
    node.set_tss_share(body.label, share);
    Ok(())
}

#[derive(Serialize)]
struct NonceBody {
    nonce: u64,
}

async fn get_nonce_handler(State(node): State<MockNode>) -> Json<NonceBody> {
    Json(NonceBody {
        nonce: *node.state.nonce.read().expect("lock poisoned"),
    })
}

#[derive(Deserialize)]
struct SetNonceBody {
    nonce: u64,
}

async fn set_nonce_handler(State(node): State<MockNode>, Json(body): Json<SetNonceBody>) {
    *node.state.nonce.write().expect("lock poisoned") = body.nonce;
}

async fn round1_handler(
    State(node): State<MockNode>,
    Json(req): Json<RssRound1Request>,
) -> Result<Json<RssRound1Response>, MockError> {
    let response = match req.key_type {
        KeyType::Secp256k1 => compute_round1::<Secp256k1Curve>(&node, &req)?,
        KeyType::Ed25519 => compute_round1::<Ed25519Curve>(&node, &req)?,
    };
    Ok(Json(response))
}

fn compute_round1<C: TssCurve>(
    node: &MockNode,
    req: &RssRound1Request,
) -> Result<RssRound1Response, MockError> {
    let zero = C::Scalar::from(0u64);
    let one = C::Scalar::from(1u64);

    let servers_info = match req.server_set {
        rss_types::api::ServerSet::Old => req
            .old_servers_info
            .as_ref()
            .ok_or_else(|| MockError::BadRequest("old request missing old_servers_info".into()))?,
        rss_types::api::ServerSet::New => &req.new_servers_info,
    };
    if !servers_info.selected.contains(&req.server_index) {
        return Err(MockError::BadRequest(format!(
            "server_index {} is not in the selected set",
            req.server_index
        )));
    }

    let selected_scalars: Vec<C::Scalar> = servers_info
        .selected
        .iter()
        .map(|&j| C::Scalar::from(u64::from(j)))
        .collect();
    let my_scalar = C::Scalar::from(u64::from(req.server_index));
    let l_committee = poly::lagrange_coeff(&selected_scalars, my_scalar, zero)?;

    let tss_server_share_bytes = node
        .state
        .tss_shares
        .read()
        .expect("lock poisoned")
        .get(&req.auth.label)
        .copied()
        .ok_or_else(|| MockError::UnknownLabel(req.auth.label.clone()))?;
    let tss_server_share = curve::field_from_be_bytes::<C::Scalar>(&tss_server_share_bytes);

    let server_threshold = usize::from(req.new_servers_info.threshold);
    let server_pub_keys = &req.new_servers_info.pubkeys;
    let user_temp_pubkey = hex_point_to_uncompressed(&req.user_temp_pubkey)?;

    let mut rng = OsRng;
    let mut data = Vec::with_capacity(req.target_index.len());
    for &target in &req.target_index {
        if !(2..=3).contains(&target) {
            return Err(MockError::BadRequest(format!(
                "target index {target} is not in {{2, 3}}"
            )));
        }
        let target_scalar = C::Scalar::from(u64::from(target));
        let l_mid2 = poly::lagrange_coeff(&[zero, one], zero, target_scalar)?;

        let lc_server = match req.old_user_share_index {
            Some(old_user_share_index) => {
                if !(2..=3).contains(&old_user_share_index) {
                    return Err(MockError::BadRequest(
                        "old_user_share_index is not in {2, 3}".into(),
                    ));
                }
                let old_idx_scalar = C::Scalar::from(u64::from(old_user_share_index));
                let l_mid = poly::lagrange_coeff(&[one, old_idx_scalar], one, zero)?;
                l_committee * l_mid * l_mid2
            }
            None => l_committee * l_mid2,
        };

        let master_poly = poly::gen_poly(1, Some(lc_server * tss_server_share), &mut rng);
        let m1 = master_poly.eval(one);
        let server_poly = poly::gen_poly(server_threshold.saturating_sub(1), Some(m1), &mut rng);

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
        let user_enc = rss_crypto::encrypt(&user_temp_pubkey, &curve::field_to_be_bytes(user_share))?;

        let mut server_encs = Vec::with_capacity(server_pub_keys.len());
        for (j, server_pub) in server_pub_keys.iter().enumerate() {
            let share = server_poly.eval(C::Scalar::from(u64::try_from(j + 1).unwrap()));
            let pub_bytes = hex_point_to_uncompressed(server_pub)?;
            server_encs.push(rss_crypto::encrypt(
                &pub_bytes,
                &curve::field_to_be_bytes(share),
            )?);
        }

        data.push(RssRound1ResponseData {
            master_poly_commits,
            server_poly_commits,
            target_encryptions: TargetEncryptions {
                user_enc,
                server_encs,
            },
        });
    }

    Ok(RssRound1Response {
        target_index: req.target_index.clone(),
        data,
    })
}

async fn round2_handler(
    State(node): State<MockNode>,
    Json(req): Json<RssRound2Request>,
) -> Result<Json<RssRound2Response>, MockError> {
    let response = match req.key_type {
        KeyType::Secp256k1 => compute_round2::<Secp256k1Curve>(&node, &req)?,
        KeyType::Ed25519 => compute_round2::<Ed25519Curve>(&node, &req)?,
    };
    Ok(Json(response))
}

fn compute_round2<C: TssCurve>(
    node: &MockNode,
    req: &RssRound2Request,
) -> Result<RssRound2Response, MockError> {
    let priv_bytes = *node.state.ecies_priv.read().expect("lock poisoned");
    let server_index_scalar = C::Scalar::from(u64::from(node.index()));

    let mut data = Vec::with_capacity(req.data.len());
    for entry in &req.data {
        if entry.master_commits.len() != 2 {
            return Err(MockError::BadRequest(
                "master_commits must have exactly 2 entries".into(),
            ));
        }
        let master_commits = entry
            .master_commits
            .iter()
            .map(curve::hex_to_point::<C>)
            .collect::<Result<Vec<_>, _>>()?;
        let server_commits = entry
            .server_commits
            .iter()
            .map(curve::hex_to_point::<C>)
            .collect::<Result<Vec<_>, _>>()?;

        if curve::add_affine::<C>(master_commits[0], master_commits[1]) != server_commits[0] {
            return Err(MockError::CommitConsistency(
                "mc[0] + mc[1] != sc[0]".into(),
            ));
        }

        let mut sum = C::Scalar::from(0u64);
        for enc in &entry.server_encs {
            let bytes = rss_crypto::decrypt(&priv_bytes, enc)?;
            sum += curve::field_from_be_bytes::<C::Scalar>(&bytes);
        }

        let mut power = C::Scalar::from(1u64);
        let mut expected = C::Affine::zero();
        for commitment in &server_commits {
            let term = (commitment.into_group() * power).into_affine();
            expected = curve::add_affine::<C>(expected, term);
            power *= server_index_scalar;
        }
        if curve::commit::<C>(sum) != expected {
            return Err(MockError::CommitConsistency(
                "aggregated share does not evaluate server_commits at this server's index".into(),
            ));
        }

        let mut encs = Vec::with_capacity(entry.factor_pubkeys.len());
        for factor_pub in &entry.factor_pubkeys {
            let pub_bytes = hex_point_to_uncompressed(factor_pub)?;
            encs.push(rss_crypto::encrypt(
                &pub_bytes,
                &curve::field_to_be_bytes(sum),
            )?);
        }
        data.push(RssRound2ResponseData { encs });
    }

    Ok(RssRound2Response {
        target_index: req.target_index.clone(),
        data,
    })
}

fn hex_point_to_uncompressed(point: &HexPoint) -> Result<Vec<u8>, MockError> {
    let (x, y) = point
        .to_coordinates()
        .map_err(|e| MockError::BadRequest(e.to_string()))?
        .ok_or_else(|| MockError::BadRequest("expected a non-identity point".into()))?;
    let mut out = Vec::with_capacity(65);
    out.push(0x04);
    out.extend_from_slice(&x);
    out.extend_from_slice(&y);
    Ok(out)
}
