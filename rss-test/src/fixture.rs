//! Deterministic DKG-state fixtures for integration tests.
//!
//! The real "old DKG share" / "new DKG share" that seed a server's
//! hierarchical sharing are produced by a reshare/DKG service that is
//! explicitly out of scope here. To exercise a full refresh/import round
//! trip we still need *some* set of `tss_share` values that are
//! algebraically consistent with a chosen `tssPrivKey`/`dkgNewPriv` pair for
//! one target index; these builders solve for exactly that, the same way a
//! real DKG round would have produced them, then push the resulting shares
//! into each [`MockNode`] via [`MockNode::set_tss_share`].
//!
//! Every fixture here is single-target: the `Lagrange([1,t],t,0)` factor that
//! binds a target's aggregated master commitment back to `tssPrivKey`
//! changes with `t`, so a server committee seeded for one target cannot also
//! satisfy a different target from the same `tss_share` values without a
//! second, independent DKG round. Real deployments run one end-to-end call
//! per target for this reason; so do these fixtures.

use rand::{CryptoRng, RngCore};
use rss_core::curve::{self, TssCurve};
use rss_core::poly;
use rss_types::HexPoint;

use crate::server::MockNode;

fn to_bytes32<F: ark_ff::PrimeField>(value: F) -> [u8; 32] {
    curve::field_to_be_bytes(value)
        .try_into()
        .expect("field elements encode to exactly 32 bytes")
}

fn eta1_eta2<C: TssCurve>(target: u8) -> (C::Scalar, C::Scalar) {
    let one = C::Scalar::from(1u64);
    let zero = C::Scalar::from(0u64);
    let t = C::Scalar::from(u64::from(target));
    let indices = [one, t];
    (
        poly::lagrange_coeff(&indices, one, zero).expect("target != 1"),
        poly::lagrange_coeff(&indices, t, zero).expect("target != 1"),
    )
}

fn seed_shares<C: TssCurve>(
    nodes: &[MockNode],
    selected: &[u16],
    threshold: usize,
    intercept: C::Scalar,
    label: &str,
    rng: &mut (impl RngCore + CryptoRng),
) {
    let poly = poly::gen_poly(threshold.saturating_sub(1), Some(intercept), rng);
    for &j in selected {
        let node = nodes
            .iter()
            .find(|n| n.index() == j)
            .expect("selected index must name a node in the committee");
        let share = poly.eval(C::Scalar::from(u64::from(j)));
        node.set_tss_share(label, to_bytes32(share));
    }
}

/// A self-consistent refresh fixture for a single target index: a chosen
/// `tssPrivKey`/`dkgNewPriv` pair, an `inputShare` at `inputIndex`, and a
/// freshly seeded `new_label` (and zeroed `old_label`) server committee
/// share such that the protocol's round-1 consistency checks hold.
pub struct RefreshFixture<C: TssCurve> {
    /// The private key the refreshed share must reconstruct to (test-only;
    /// never given to the client).
    pub tss_priv_key: C::Scalar,
    /// Its public counterpart, passed as [`rss_client::RssClientConfig::tss_pub_key`].
    pub tss_pub_key: HexPoint,
    /// The other half of the 2-of-2 (test-only).
    pub dkg_new_priv: C::Scalar,
    /// Its public counterpart, passed as `RefreshOpts::dkg_new_pub`.
    pub dkg_new_pub: HexPoint,
    /// The user's current share at `input_index`, as big-endian bytes.
    pub input_share: [u8; 32],
    /// The index `input_share` was generated at.
    pub input_index: u8,
}

/// Builds a [`RefreshFixture`] and seeds every selected node's `old_label`
/// (zeroed) and `new_label` (solved) shares for `target`.
pub fn build_refresh_fixture<C: TssCurve>(
    nodes: &[MockNode],
    selected: &[u16],
    threshold: usize,
    target: u8,
    input_index: u8,
    old_label: &str,
    new_label: &str,
    rng: &mut (impl RngCore + CryptoRng),
) -> RefreshFixture<C> {
    let tss_priv_key = curve::random_nonzero_scalar::<C::Scalar>(rng);
    let dkg_new_priv = curve::random_nonzero_scalar::<C::Scalar>(rng);
    let input_share = curve::random_nonzero_scalar::<C::Scalar>(rng);

    let (eta1, _) = eta1_eta2::<C>(target);
    let k_needed = tss_priv_key - eta1 * dkg_new_priv;

    let one = C::Scalar::from(1u64);
    let zero = C::Scalar::from(0u64);
    let input_index_s = C::Scalar::from(u64::from(input_index));
    let l_client = poly::lagrange_coeff(&[one, input_index_s], input_index_s, zero)
        .expect("input_index != 1");

    seed_shares::<C>(nodes, selected, threshold, zero, old_label, rng);
    let s_new = k_needed - l_client * input_share;
    seed_shares::<C>(nodes, selected, threshold, s_new, new_label, rng);

    RefreshFixture {
        tss_priv_key,
        tss_pub_key: curve::point_to_hex::<C>(curve::commit::<C>(tss_priv_key)),
        dkg_new_priv,
        dkg_new_pub: curve::point_to_hex::<C>(curve::commit::<C>(dkg_new_priv)),
        input_share: to_bytes32(input_share),
        input_index,
    }
}

/// A self-consistent import fixture: like [`RefreshFixture`] but with no
/// "old" side, since importing brings a secret into the scheme for the
/// first time.
pub struct ImportFixture<C: TssCurve> {
    /// The private key the imported share must reconstruct to (test-only).
    pub tss_priv_key: C::Scalar,
    /// Its public counterpart.
    pub tss_pub_key: HexPoint,
    /// The other half of the 2-of-2 (test-only).
    pub dkg_new_priv: C::Scalar,
    /// Its public counterpart, passed as `ImportOpts::dkg_new_pub`.
    pub dkg_new_pub: HexPoint,
    /// The externally generated secret being imported.
    pub import_key: [u8; 32],
}

/// Builds an [`ImportFixture`] and seeds every selected node's `new_label`
/// share for `target`.
pub fn build_import_fixture<C: TssCurve>(
    nodes: &[MockNode],
    selected: &[u16],
    threshold: usize,
    target: u8,
    new_label: &str,
    rng: &mut (impl RngCore + CryptoRng),
) -> ImportFixture<C> {
    let tss_priv_key = curve::random_nonzero_scalar::<C::Scalar>(rng);
    let dkg_new_priv = curve::random_nonzero_scalar::<C::Scalar>(rng);
    let import_key = curve::random_nonzero_scalar::<C::Scalar>(rng);

    let (eta1, _) = eta1_eta2::<C>(target);
    let k_needed = tss_priv_key - eta1 * dkg_new_priv;
    let s_new = k_needed - import_key;

    seed_shares::<C>(nodes, selected, threshold, s_new, new_label, rng);

    ImportFixture {
        tss_priv_key,
        tss_pub_key: curve::point_to_hex::<C>(curve::commit::<C>(tss_priv_key)),
        dkg_new_priv,
        dkg_new_pub: curve::point_to_hex::<C>(curve::commit::<C>(dkg_new_priv)),
        import_key: to_bytes32(import_key),
    }
}
