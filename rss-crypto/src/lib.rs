//! # ECIES hybrid encryption
//!
//! Implements the secp256k1 ECIES wrapper the refresh protocol uses to
//! ship scalar shares to servers, factor keys, and the client's own
//! ephemeral key. This is used **regardless of the TSS curve** — even when
//! the TSS key lives on ed25519, every [`EncryptedMessage`] on the wire is
//! secp256k1 ECDH + AES-256-CBC + HMAC-SHA256. Preserving that mismatch is
//! a deliberate protocol invariant, not an oversight.
#![deny(missing_docs)]

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use k256::{
    PublicKey, SecretKey,
    ecdh::diffie_hellman,
    elliptic_curve::sec1::ToEncodedPoint,
};
use rand::{RngCore, rngs::OsRng};
use rss_types::EncryptedMessage;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const AES_KEY_LEN: usize = 32;
const MAC_KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// Errors raised by the hybrid encryption layer.
#[derive(Debug, Error)]
pub enum EciesError {
    /// A public/private key was not a valid secp256k1 key encoding.
    #[error("malformed secp256k1 key: {0}")]
    MalformedKey(String),
    /// A hex field in an [`EncryptedMessage`] was not valid hex.
    #[error("malformed hex field: {0}")]
    MalformedHex(#[from] hex::FromHexError),
    /// Padding was inconsistent with PKCS#7 after decryption.
    #[error("malformed ciphertext padding")]
    MalformedPadding,
    /// The HMAC tag did not match.
    #[error("mac verification failed")]
    MacMismatch,
}

/// Encrypts `msg` to the uncompressed secp256k1 public key `pub_bytes`
/// (65 bytes: `04 || x || y`), returning a hex-encoded [`EncryptedMessage`].
///
/// A fresh ephemeral keypair is generated internally for every call.
pub fn encrypt(pub_bytes: &[u8], msg: &[u8]) -> Result<EncryptedMessage, EciesError> {
    let recipient = PublicKey::from_sec1_bytes(pub_bytes)
        .map_err(|e| EciesError::MalformedKey(e.to_string()))?;
    let ephemeral = SecretKey::random(&mut OsRng);
    let ephemeral_pub = ephemeral.public_key();

    let shared = diffie_hellman(ephemeral.to_nonzero_scalar(), recipient.as_affine());
    let (aes_key, mac_key) = derive_keys(shared.raw_secret_bytes().as_slice());

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(aes_key[..].into(), iv[..].into())
        .encrypt_padded_vec_mut::<Pkcs7>(msg);

    let ephem_public_key = ephemeral_pub.to_encoded_point(false).as_bytes().to_vec();
    let mac = compute_mac(&mac_key, &iv, &ephem_public_key, &ciphertext);

    Ok(EncryptedMessage {
        ciphertext: hex::encode(ciphertext),
        ephem_public_key: hex::encode(ephem_public_key),
        iv: hex::encode(iv),
        mac: hex::encode(mac),
    })
}

/// Decrypts an [`EncryptedMessage`] using the secp256k1 private key
/// `priv_bytes` (32 bytes, big-endian).
///
/// Verifies the MAC (in constant time) before attempting to decrypt; a
/// mismatched tag or malformed padding both surface as [`EciesError`].
pub fn decrypt(priv_bytes: &[u8], msg: &EncryptedMessage) -> Result<Vec<u8>, EciesError> {
    let secret =
        SecretKey::from_slice(priv_bytes).map_err(|e| EciesError::MalformedKey(e.to_string()))?;
    let ephem_public_key = hex::decode(&msg.ephem_public_key)?;
    let ciphertext = hex::decode(&msg.ciphertext)?;
    let iv = hex::decode(&msg.iv)?;
    let expected_mac = hex::decode(&msg.mac)?;

    let ephemeral_pub = PublicKey::from_sec1_bytes(&ephem_public_key)
        .map_err(|e| EciesError::MalformedKey(e.to_string()))?;

    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral_pub.as_affine());
    let (aes_key, mac_key) = derive_keys(shared.raw_secret_bytes().as_slice());

    let mac = compute_mac(&mac_key, &iv, &ephem_public_key, &ciphertext);
    if mac.ct_eq(&expected_mac).unwrap_u8() != 1 {
        return Err(EciesError::MacMismatch);
    }

    Aes256CbcDec::new(aes_key[..].into(), iv[..].into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| EciesError::MalformedPadding)
}

fn derive_keys(shared_secret: &[u8]) -> ([u8; AES_KEY_LEN], [u8; MAC_KEY_LEN]) {
    let hkdf = Hkdf::<Sha256>::new(None, shared_secret);
    let mut okm = [0u8; AES_KEY_LEN + MAC_KEY_LEN];
    hkdf.expand(b"rss-ecies", &mut okm)
        .expect("okm length is a valid HKDF-SHA256 output size");
    let mut aes_key = [0u8; AES_KEY_LEN];
    let mut mac_key = [0u8; MAC_KEY_LEN];
    aes_key.copy_from_slice(&okm[..AES_KEY_LEN]);
    mac_key.copy_from_slice(&okm[AES_KEY_LEN..]);
    (aes_key, mac_key)
}

fn compute_mac(mac_key: &[u8], iv: &[u8], ephem_pub: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(mac_key).expect("HMAC accepts keys of any length");
    mac.update(iv);
    mac.update(ephem_pub);
    mac.update(ciphertext);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair() -> (Vec<u8>, Vec<u8>) {
        let secret = SecretKey::random(&mut OsRng);
        let pub_bytes = secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        (secret.to_bytes().to_vec(), pub_bytes)
    }

    #[test]
    fn round_trips() {
        let (sk, pk) = keypair();
        let msg = b"refreshed share bytes, 32 of them in practice...";
        let enc = encrypt(&pk, msg).unwrap();
        let dec = decrypt(&sk, &enc).unwrap();
        assert_eq!(dec, msg);
    }

    #[test]
    fn tampered_ciphertext_fails_mac() {
        let (sk, pk) = keypair();
        let mut enc = encrypt(&pk, b"hello").unwrap();
        let mut bytes = hex::decode(&enc.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        enc.ciphertext = hex::encode(bytes);
        assert!(matches!(decrypt(&sk, &enc), Err(EciesError::MacMismatch)));
    }

    #[test]
    fn tampered_mac_fails() {
        let (sk, pk) = keypair();
        let mut enc = encrypt(&pk, b"hello").unwrap();
        let mut bytes = hex::decode(&enc.mac).unwrap();
        bytes[0] ^= 0xff;
        enc.mac = hex::encode(bytes);
        assert!(matches!(decrypt(&sk, &enc), Err(EciesError::MacMismatch)));
    }
}
