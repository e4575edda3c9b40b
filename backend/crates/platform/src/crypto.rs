//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random token of `len` bytes, URL-safe base64 without padding
///
/// Safe to put into a cookie value as-is.
pub fn random_token(len: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(len))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Sign `payload` as `<payload>.<base64url(HMAC-SHA256(key, payload))>`
///
/// `payload` must not contain `.`.
pub fn sign(key: &[u8; 32], payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a value produced by [`sign`] and return its payload
///
/// Returns `None` for malformed values and bad signatures alike.
pub fn verify_signed<'a>(key: &[u8; 32], signed: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = signed.split_once('.')?;
    if signature_b64.contains('.') {
        return None;
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_random_token_is_url_safe() {
        let token = random_token(32);
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(token, random_token(32));
    }

    #[test]
    fn test_sign_and_verify() {
        let key = [7u8; 32];
        let signed = sign(&key, "abc-123");
        assert!(signed.starts_with("abc-123."));
        assert_eq!(verify_signed(&key, &signed), Some("abc-123"));
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let key = [7u8; 32];
        let signed = sign(&key, "abc-123");

        let forged = signed.replacen("abc-123", "abc-124", 1);
        assert_eq!(verify_signed(&key, &forged), None);

        let other_key = [8u8; 32];
        assert_eq!(verify_signed(&other_key, &signed), None);

        assert_eq!(verify_signed(&key, "no-signature"), None);
        assert_eq!(verify_signed(&key, "a.b.c"), None);
        assert_eq!(verify_signed(&key, "abc-123.!!!"), None);
    }
}
