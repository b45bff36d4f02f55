//! Digest primitives the signer needs. The signer only sees [`SigningCrypto`], so a
//! different provider can be plugged in without touching the SigV4 code.

use ring::{digest, hmac};

pub trait SigningCrypto: Send + Sync {
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> [u8; 32];
}

/// [`SigningCrypto`] backed by `ring`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RingCrypto;

impl SigningCrypto for RingCrypto {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(digest::digest(&digest::SHA256, data).as_ref());
        out
    }

    fn hmac_sha256(&self, key: &[u8], data: &[u8]) -> [u8; 32] {
        let key = hmac::Key::new(hmac::HMAC_SHA256, key);
        let mut out = [0u8; 32];
        out.copy_from_slice(hmac::sign(&key, data).as_ref());
        out
    }
}
