//! Wire-level dispatch of round 1 and round 2 requests.
//!
//! Round 1 is fail-fast: every selected server must answer before the
//! client can aggregate, so a single failure aborts the whole call (mirrors
//! [`futures::future::try_join_all`]). Round 2 tolerates individual
//! failures; each server's slot becomes absent in the output instead of
//! failing the call, as long as the availability floor is met.

use futures::future::{join_all, try_join_all};
use rss_types::api::{
    Auth, RssRound1Request, RssRound1Response, RssRound2Request, RssRound2RequestData,
    RssRound2Response, ServerSet, ServersInfo,
};
use rss_types::{HexPoint, KeyType};

use crate::transport::{Endpoint, ServerEndpoint};
use crate::Error;

/// Everything needed to build the one or two round-1 requests sent to a
/// single selected server.
pub struct Round1Plan<'a> {
    /// `Some` for a refresh call (old side present), `None` for import.
    pub old: Option<(&'a str, &'a ServersInfo, u8)>,
    /// The new-side session label, committee descriptor, and request.
    pub new: (&'a str, &'a ServersInfo),
    /// Pass-through authentication signatures.
    pub sigs: &'a [String],
    /// The client's ephemeral secp256k1 public key.
    pub user_temp_pubkey: &'a HexPoint,
    /// Which target indices to request a contribution for.
    pub target_index: &'a [u8],
    /// The TSS curve in use.
    pub key_type: KeyType,
}

fn build_round1_request(
    server_index: u16,
    server_set: ServerSet,
    label: &str,
    sigs: &[String],
    old_servers_info: Option<ServersInfo>,
    new_servers_info: ServersInfo,
    old_user_share_index: Option<u8>,
    user_temp_pubkey: HexPoint,
    target_index: Vec<u8>,
    key_type: KeyType,
) -> RssRound1Request {
    RssRound1Request {
        round_name: "rss_round_1".to_string(),
        server_set,
        server_index,
        old_servers_info,
        new_servers_info,
        old_user_share_index,
        user_temp_pubkey,
        target_index,
        auth: Auth {
            label: label.to_string(),
            sigs: sigs.to_vec(),
        },
        key_type,
    }
}

/// Issues every round-1 request in parallel and returns once all have
/// succeeded; any single failure aborts (round 1 is fail-fast).
pub async fn dispatch_round1(
    endpoints: &[ServerEndpoint],
    selected_servers: &[u16],
    plan: &Round1Plan<'_>,
) -> Result<Vec<RssRound1Response>, Error> {
    let mut requests = Vec::new();

    for &server_index in selected_servers {
        if let Some((label, servers_info, old_user_share_index)) = plan.old {
            requests.push((
                server_index,
                build_round1_request(
                    server_index,
                    ServerSet::Old,
                    label,
                    plan.sigs,
                    Some(servers_info.clone()),
                    plan.new.1.clone(),
                    Some(old_user_share_index),
                    plan.user_temp_pubkey.clone(),
                    plan.target_index.to_vec(),
                    plan.key_type,
                ),
            ));
        }
        let (new_label, new_servers_info) = plan.new;
        requests.push((
            server_index,
            build_round1_request(
                server_index,
                ServerSet::New,
                new_label,
                plan.sigs,
                None,
                new_servers_info.clone(),
                None,
                plan.user_temp_pubkey.clone(),
                plan.target_index.to_vec(),
                plan.key_type,
            ),
        ));
    }

    let futs = requests.into_iter().map(|(server_index, request)| {
        let endpoints = endpoints;
        async move {
            let endpoint = endpoints
                .get(usize::from(server_index) - 1)
                .ok_or_else(|| {
                    Error::InputInvariant(format!("server index {server_index} out of range"))
                })?;
            let body = serde_json::to_value(&request).map_err(crate::transport::TransportError::from)?;
            let response = endpoint.post("/rss_round_1", body).await?;
            let parsed: RssRound1Response =
                serde_json::from_value(response).map_err(crate::transport::TransportError::from)?;
            Ok::<_, Error>(parsed)
        }
    });

    try_join_all(futs).await
}

/// Issues a round-2 request to every server in the committee, returning one
/// slot per server: `Some` on success, `None` on any failure (transport,
/// deserialization, or non-success status). Failures are logged and
/// otherwise tolerated by the caller up to the availability floor.
///
/// `columns[j]` holds one [`RssRound2RequestData`] per target index — the
/// `master_commits`/`server_commits` are identical across servers, but
/// `server_encs` is that server's own column of the transposed ciphertext
/// matrix.
pub async fn dispatch_round2(
    endpoints: &[ServerEndpoint],
    target_index: &[u8],
    columns: &[Vec<RssRound2RequestData>],
    key_type: KeyType,
) -> Vec<Option<RssRound2Response>> {
    let futs = endpoints.iter().enumerate().map(|(idx, endpoint)| {
        let server_index = u16::try_from(idx + 1).expect("server count fits in u16");
        let request = RssRound2Request {
            round_name: "rss_round_2".to_string(),
            server_index,
            target_index: target_index.to_vec(),
            data: columns[idx].clone(),
            key_type,
        };
        async move {
            let body = serde_json::to_value(&request).ok()?;
            let response = match endpoint.post("/rss_round_2", body).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!(server_index, error = %err, "round 2 request failed");
                    return None;
                }
            };
            match serde_json::from_value::<RssRound2Response>(response) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    tracing::warn!(server_index, error = %err, "round 2 response malformed");
                    None
                }
            }
        }
    });

    join_all(futs).await
}
