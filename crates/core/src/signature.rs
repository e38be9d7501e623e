//! Webhook HMAC signature verification.
//!
//! Senders sign the raw request body with HMAC-SHA256 keyed by a shared
//! secret and send it as `X-Hub-Signature-256: sha256=<hex digest>`.
//! [`verify`] recomputes the digest and compares it in constant time.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// Shared signing secret.
///
/// `Debug` is redacted so the secret cannot end up in logs through a
/// derived `Debug` on a config struct.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wrap a secret. Returns `None` for an empty string, which callers treat
    /// as "no secret configured".
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.0.as_bytes()).expect("HMAC accepts any key length")
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Signing / verification
// ---------------------------------------------------------------------------

/// Compute the `X-Hub-Signature-256` header value for a payload.
pub fn sign(payload: &[u8], secret: &WebhookSecret) -> String {
    let mut mac = secret.mac();
    mac.update(payload);
    format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a raw request body against its signature header.
///
/// With no secret configured every payload is accepted and a warning is
/// logged on each call. A missing header, a header without the `sha256=`
/// prefix, or a digest that is not valid hex all count as a mismatch.
pub fn verify(payload: &[u8], signature_header: Option<&str>, secret: Option<&WebhookSecret>) -> bool {
    let Some(secret) = secret else {
        tracing::warn!("No webhook secret configured, signature verification skipped");
        return true;
    };

    let Some(digest_hex) = signature_header.and_then(|h| h.strip_prefix(SIGNATURE_PREFIX)) else {
        return false;
    };

    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };

    let mut mac = secret.mac();
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> WebhookSecret {
        WebhookSecret::new(s).unwrap()
    }

    const BODY: &[u8] = br#"{"action":"opened","number":1}"#;

    #[test]
    fn signed_payload_verifies() {
        let s = secret("It's a Secret to Everybody");
        let header = sign(BODY, &s);
        assert!(verify(BODY, Some(&header), Some(&s)));
    }

    #[test]
    fn known_digest_matches() {
        // Reference vector from GitHub's webhook validation docs.
        let s = secret("It's a Secret to Everybody");
        assert_eq!(
            sign(b"Hello, World!", &s),
            "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17"
        );
    }

    #[test]
    fn different_secret_is_rejected() {
        let header = sign(BODY, &secret("right"));
        assert!(!verify(BODY, Some(&header), Some(&secret("wrong"))));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let s = secret("right");
        let header = sign(BODY, &s);
        assert!(!verify(br#"{"action":"closed","number":1}"#, Some(&header), Some(&s)));
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(!verify(BODY, None, Some(&secret("right"))));
    }

    #[test]
    fn wrong_prefix_is_rejected() {
        let s = secret("right");
        let header = sign(BODY, &s).replacen("sha256=", "sha1=", 1);
        assert!(!verify(BODY, Some(&header), Some(&s)));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let s = secret("right");
        assert!(!verify(BODY, Some("sha256=not-hex-at-all"), Some(&s)));
        assert!(!verify(BODY, Some("sha256="), Some(&s)));
        assert!(!verify(BODY, Some("sha256=abcd"), Some(&s)));
    }

    #[test]
    fn uppercase_hex_digest_is_accepted() {
        let s = secret("right");
        let header = sign(BODY, &s);
        let upper = format!("sha256={}", header["sha256=".len()..].to_uppercase());
        assert!(verify(BODY, Some(&upper), Some(&s)));
    }

    #[test]
    fn no_secret_accepts_anything() {
        assert!(verify(BODY, None, None));
        assert!(verify(BODY, Some("sha256=garbage"), None));
    }

    #[test]
    fn empty_secret_means_no_secret() {
        assert!(WebhookSecret::new("").is_none());
    }

    #[test]
    fn debug_output_is_redacted() {
        let s = secret("super-secret-value");
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("super-secret-value"));
    }
}
