//! Paystack webhook signature verification.
//!
//! Paystack signs every webhook with HMAC-SHA512 over the raw request body,
//! keyed by the merchant's secret key, and sends the lowercase hex digest in
//! the signature header. Verification must run on the exact bytes received:
//! re-serializing parsed JSON changes whitespace and key order.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Verifier for Paystack webhook signatures.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    /// Creates a new verifier keyed by the merchant secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Returns true only if `signature_header` is the hex HMAC-SHA512 of
    /// `raw_body`.
    ///
    /// A missing header or an empty secret always fails.
    pub fn verify(&self, raw_body: &[u8], signature_header: Option<&str>) -> bool {
        let Some(header) = signature_header else {
            return false;
        };
        match self.sign(raw_body) {
            Some(expected) => constant_time_compare(expected.as_bytes(), header.as_bytes()),
            None => false,
        }
    }

    /// Computes the hex signature Paystack would send for `raw_body`.
    ///
    /// Returns `None` when no secret is configured.
    pub fn sign(&self, raw_body: &[u8]) -> Option<String> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return None;
        }
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(raw_body);
        Some(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

/// Checks `signature_header` against the HMAC-SHA512 of `raw_body`.
pub fn verify(raw_body: &[u8], signature_header: &str, shared_secret: &str) -> bool {
    SignatureVerifier::new(shared_secret).verify(raw_body, Some(signature_header))
}

/// Performs constant-time comparison of two byte slices.
///
/// Length is not secret (the digest length is fixed), so a length mismatch
/// returns early.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
