//! Webhook signature verification using HMAC-SHA256.
//!
//! The signing secret is not configured up front. It is learned from the
//! first handshake request carrying a `verification_token`, and until then
//! every request is accepted without a signature check.

use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-notion-signature";
const SIGNATURE_PREFIX: &str = "sha256=";

/// Process-wide signing secret, set at most once.
#[derive(Default)]
pub struct SharedSecret {
    secret: RwLock<Option<Arc<str>>>,
}

impl SharedSecret {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `token` unless a secret is already registered. Returns whether
    /// this call set it.
    pub fn register(&self, token: &str) -> bool {
        let mut guard = self.secret.write();
        if guard.is_some() {
            return false;
        }
        *guard = Some(Arc::from(token));
        true
    }

    pub fn is_set(&self) -> bool {
        self.secret.read().is_some()
    }

    /// Checks `signature_header` against `body`. Always passes when no
    /// secret has been registered yet.
    pub fn verify(&self, body: &[u8], signature_header: &str) -> bool {
        let secret = self.secret.read().clone();
        match secret {
            Some(secret) => verify_signature(body, signature_header, secret.as_bytes()),
            None => true,
        }
    }
}

/// Checks a `sha256=<hex>` header against the HMAC-SHA256 of `payload`.
///
/// Anything that is not a well-formed header fails. The digest comparison
/// is constant-time.
pub fn verify_signature(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    let Some(expected) = signature_header
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(|digest| hex::decode(digest).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

/// Signs `payload` the way a caller holding `secret` would.
#[cfg(test)]
pub(crate) fn signature_header(payload: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(payload);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}
