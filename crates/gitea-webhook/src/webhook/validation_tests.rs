//! Tests for webhook signature validation.

use super::*;

const KNOWN_SECRET: &[u8] = b"123456";
const KNOWN_BODY: &[u8] = br#"{"secret": "123456", "number": 23}"#;
const KNOWN_SIGNATURE: &str = "cd2f9b218db846d088a6ed5d7cb0ec0ee8f6da141dab90c3fd826d3e7e7918fd";

/// Compute the reference signature independently of the code under test.
fn reference_signature(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

// ============================================================================
// Test: Valid Signature Validation
// ============================================================================

#[test]
fn test_compute_signature_matches_known_vector() {
    assert_eq!(compute_signature(KNOWN_SECRET, KNOWN_BODY), KNOWN_SIGNATURE);
}

#[test]
fn test_verify_with_known_vector() {
    assert!(verify_signature(KNOWN_SECRET, KNOWN_BODY, KNOWN_SIGNATURE));
}

#[test]
fn test_verify_with_valid_signature_for_various_inputs() {
    let cases: [(&[u8], &[u8]); 5] = [
        (b"test_webhook_secret", br#"{"action":"opened","number":1}"#),
        (b"", b""),
        (b"secret", b""),
        ("s\u{e9}cr\u{e8}t-\u{1F510}".as_bytes(), "{\"message\":\"\u{1F680} \u{4F60}\u{597D}\"}".as_bytes()),
        (&[0u8; 200], &[0xffu8; 10_000]),
    ];

    for (secret, payload) in cases {
        let signature = reference_signature(secret, payload);
        assert!(
            verify_signature(secret, payload, &signature),
            "valid signature should pass validation"
        );
    }
}

/// The signature is over the raw bytes, so a semantically identical but
/// differently formatted body must not verify.
#[test]
fn test_verify_uses_raw_bytes_not_json_semantics() {
    let reformatted = br#"{"number":23,"secret":"123456"}"#;

    assert!(!verify_signature(KNOWN_SECRET, reformatted, KNOWN_SIGNATURE));
}

// ============================================================================
// Test: Invalid Signature Detection
// ============================================================================

#[test]
fn test_verify_with_wrong_secret() {
    assert!(!verify_signature(b"654321", KNOWN_BODY, KNOWN_SIGNATURE));
}

#[test]
fn test_verify_detects_every_single_bit_flip_in_body() {
    for byte in 0..KNOWN_BODY.len() {
        for bit in 0..8 {
            let mut tampered = KNOWN_BODY.to_vec();
            tampered[byte] ^= 1 << bit;
            assert!(
                !verify_signature(KNOWN_SECRET, &tampered, KNOWN_SIGNATURE),
                "flip of bit {bit} in byte {byte} was not detected"
            );
        }
    }
}

#[test]
fn test_verify_detects_every_single_bit_flip_in_signature() {
    for index in 0..KNOWN_SIGNATURE.len() {
        for bit in 0..8 {
            let mut tampered = KNOWN_SIGNATURE.as_bytes().to_vec();
            tampered[index] ^= 1 << bit;
            let Ok(tampered) = String::from_utf8(tampered) else {
                continue;
            };
            assert!(
                !verify_signature(KNOWN_SECRET, KNOWN_BODY, &tampered),
                "flip of bit {bit} in signature char {index} was not detected"
            );
        }
    }
}

#[test]
fn test_verify_rejects_malformed_signatures() {
    let truncated = &KNOWN_SIGNATURE[..63];
    let extended = format!("{}0", KNOWN_SIGNATURE);
    let uppercase = KNOWN_SIGNATURE.to_uppercase();
    let prefixed = format!("sha256={}", KNOWN_SIGNATURE);

    for signature in ["", "blah", truncated, &extended, &uppercase, &prefixed] {
        assert!(
            !verify_signature(KNOWN_SECRET, KNOWN_BODY, signature),
            "malformed signature {signature:?} should be rejected"
        );
    }
}

#[test]
fn test_constant_time_compare() {
    assert!(constant_time_compare(b"abcd", b"abcd"));
    assert!(!constant_time_compare(b"abcd", b"abce"));
    assert!(!constant_time_compare(b"abcd", b"abc"));
    assert!(constant_time_compare(b"", b""));
}

// ============================================================================
// Test: SignatureValidator
// ============================================================================

#[test]
fn test_validator_uses_configured_secret() {
    let validator = SignatureValidator::new(WebhookSecret::new("123456"));
    assert!(validator.validate(KNOWN_BODY, KNOWN_SIGNATURE));

    let validator = SignatureValidator::new(WebhookSecret::new("different"));
    assert!(!validator.validate(KNOWN_BODY, KNOWN_SIGNATURE));
}

#[test]
fn test_debug_output_does_not_expose_secrets() {
    let secret = WebhookSecret::new("super-secret-value");
    let validator = SignatureValidator::new(secret.clone());

    let secret_debug = format!("{:?}", secret);
    let validator_debug = format!("{:?}", validator);

    assert!(!secret_debug.contains("super-secret-value"));
    assert!(!validator_debug.contains("super-secret-value"));
    assert!(validator_debug.contains("REDACTED"));
}

#[test]
fn test_webhook_secret_accessors() {
    assert!(WebhookSecret::new("").is_empty());
    assert_eq!(WebhookSecret::new("abc").as_bytes(), b"abc");
}
