//! Signature check of incoming webhook requests
//!
//! Meta signs every callback body with HMAC-SHA256 keyed by the app secret and
//! sends it as `X-Hub-Signature-256: sha256=<hex>`. The digest is computed over
//! the raw body bytes, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{error, warn};

type HmacSha256 = Hmac<Sha256>;

/// Verifies the X-Hub-Signature-256 header against the request payload
///
/// # Arguments
///
/// * `signature_header` - The value of the X-Hub-Signature-256 header (e.g., "sha256=abc123...")
/// * `payload` - The raw request body bytes
/// * `app_secret` - The app secret of the Meta application
///
/// Returns `false` on a malformed header as well as on a mismatch. The
/// comparison runs in constant time.
///
/// # Example
///
/// ```
/// use wa_cloud::webhook::whatsapp::security::verify_signature;
///
/// let header = "sha256=abc123def456";
/// let payload = b"{\"object\":\"whatsapp_business_account\"}";
///
/// assert!(!verify_signature(header, payload, "app-secret"));
/// ```
pub fn verify_signature(signature_header: &str, payload: &[u8], app_secret: &str) -> bool {
    let Some(signature_hex) = signature_header.strip_prefix("sha256=") else {
        warn!("Invalid signature header format: expected 'sha256=' prefix");
        return false;
    };

    let expected_signature = match hex::decode(signature_hex) {
        Ok(sig) => sig,
        Err(e) => {
            warn!("Failed to decode signature hex: {}", e);
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            error!("Failed to create HMAC instance: {}", e);
            return false;
        }
    };

    mac.update(payload);
    let computed_signature = mac.finalize().into_bytes();

    let is_valid: bool = computed_signature.ct_eq(&expected_signature[..]).into();

    if !is_valid {
        warn!("Webhook signature verification failed: signatures do not match");
    }

    is_valid
}

/// `sha256=<hex>` header value for `payload`, as Meta computes it
pub fn sign_payload(payload: &[u8], app_secret: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes()).ok()?;
    mac.update(payload);

    Some(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_signature_valid() {
        let payload = b"{\"object\":\"whatsapp_business_account\",\"entry\":[]}";
        let secret = "test_secret";

        let header = sign_payload(payload, secret).unwrap();

        assert!(header.starts_with("sha256="));
        assert!(verify_signature(&header, payload, secret));
    }

    #[test]
    fn test_verify_signature_invalid() {
        let payload = b"{\"test\":\"data\"}";
        let wrong_signature =
            "sha256=0000000000000000000000000000000000000000000000000000000000000000";

        assert!(!verify_signature(wrong_signature, payload, "test_secret"));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let payload = b"{\"test\":\"data\"}";
        let header = sign_payload(payload, "wrong_secret").unwrap();

        assert!(!verify_signature(&header, payload, "test_secret"));
    }

    #[test]
    fn test_verify_signature_invalid_header_format() {
        let payload = b"{\"test\":\"data\"}";
        let secret = "test_secret";

        assert!(!verify_signature("abc123", payload, secret));
        assert!(!verify_signature("sha1=abc123", payload, secret));
        assert!(!verify_signature("sha256=zzzzz", payload, secret));
    }

    #[test]
    fn test_verify_signature_tampered_payload() {
        let secret = "test_secret";
        let header = sign_payload(b"{\"test\":\"data\"}", secret).unwrap();

        assert!(!verify_signature(&header, b"{\"test\":\"hacked\"}", secret));
    }
}
