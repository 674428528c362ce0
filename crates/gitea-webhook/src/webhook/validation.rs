//! Webhook signature validation implementation.
//!
//! Gitea signs every delivery with HMAC-SHA256 over the raw request body,
//! keyed with the secret configured on the webhook, and sends the lowercase
//! hex digest in the `X-Gitea-Signature` header.
//!
//! The digest must be computed over the bytes exactly as received. Decoding
//! the JSON and re-encoding it before hashing changes key order and
//! whitespace and breaks verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Shared secret used to authenticate webhook deliveries.
///
/// The value never appears in `Debug` output.
#[derive(Clone)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret bytes used as the HMAC key.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(<REDACTED>)")
    }
}

/// Compute the lowercase hex HMAC-SHA256 signature of `payload`.
///
/// # Examples
///
/// ```rust
/// use gitea_webhook::webhook::compute_signature;
///
/// let signature = compute_signature(b"123456", br#"{"secret": "123456", "number": 23}"#);
/// assert_eq!(
///     signature,
///     "cd2f9b218db846d088a6ed5d7cb0ec0ee8f6da141dab90c3fd826d3e7e7918fd"
/// );
/// ```
pub fn compute_signature(secret: &[u8], payload: &[u8]) -> String {
    hex::encode(compute_hmac(secret, payload))
}

/// Verify that `signature` is the HMAC-SHA256 of `payload` under `secret`.
///
/// The expected digest is hex-encoded in lowercase and compared with the
/// asserted value in constant time. Any mismatch, including a length
/// mismatch or upper-case hex, yields `false`.
///
/// # Examples
///
/// ```rust
/// use gitea_webhook::webhook::{compute_signature, verify_signature};
///
/// let payload = br#"{"ref":"refs/heads/main"}"#;
/// let signature = compute_signature(b"secret", payload);
///
/// assert!(verify_signature(b"secret", payload, &signature));
/// assert!(!verify_signature(b"other", payload, &signature));
/// ```
pub fn verify_signature(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    let expected = compute_signature(secret, payload);
    constant_time_compare(expected.as_bytes(), signature.as_bytes())
}

fn compute_hmac(secret: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    // Lengths are public (a SHA-256 hex digest is always 64 bytes)
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}

/// Validates Gitea webhook signatures with a fixed shared secret.
///
/// # Examples
///
/// ```rust
/// use gitea_webhook::webhook::{compute_signature, SignatureValidator, WebhookSecret};
///
/// let validator = SignatureValidator::new(WebhookSecret::new("123456"));
/// let payload = br#"{"number": 1}"#;
///
/// let signature = compute_signature(b"123456", payload);
/// assert!(validator.validate(payload, &signature));
/// ```
#[derive(Clone)]
pub struct SignatureValidator {
    secret: WebhookSecret,
}

impl SignatureValidator {
    /// Create a new signature validator.
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }

    /// Validate a webhook signature against the raw payload bytes.
    ///
    /// Returns `true` only when the signature matches exactly.
    pub fn validate(&self, payload: &[u8], signature: &str) -> bool {
        verify_signature(self.secret.as_bytes(), payload, signature)
    }
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureValidator")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
