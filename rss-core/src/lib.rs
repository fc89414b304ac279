//! # RSS curve adapter and polynomial kit
//!
//! Provides a uniform interface over the two curves a TSS key can live on
//! (secp256k1, ed25519), and the modular-arithmetic building blocks
//! (polynomial generation, evaluation, Lagrange interpolation) the refresh
//! protocol is built from. Everything here is pure and synchronous.
#![deny(missing_docs)]

pub mod curve;
pub mod poly;

pub use curve::{Ed25519Curve, Secp256k1Curve, TssCurve};
