//! # v1 wire API
//!
//! Request/response payloads for the two-round RSS protocol, plus the
//! client-facing output type. These mirror the JSON bodies posted to and
//! received from `/rss_round_1` and `/rss_round_2`.

mod refresh_response;
mod round1;
mod round2;
mod servers_info;

pub use refresh_response::RefreshResponse;
pub use round1::{Auth, RssRound1Request, RssRound1Response, RssRound1ResponseData, ServerSet, TargetEncryptions};
pub use round2::{RssRound2Request, RssRound2RequestData, RssRound2Response, RssRound2ResponseData};
pub use servers_info::ServersInfo;
