//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random URL-safe token carrying `len` bytes of OS entropy
pub fn random_token(len: usize) -> String {
    to_base64url(&random_bytes(len))
}

/// Encode bytes as URL-safe base64 without padding
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}

/// Signs opaque values as `<value>.<hmac-sha256>` and verifies them back.
///
/// The value itself must not contain `.`; base64url output never does.
#[derive(Clone)]
pub struct TokenSigner {
    key: [u8; 32],
}

impl TokenSigner {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn mac(&self) -> HmacSha256 {
        <HmacSha256 as Mac>::new_from_slice(&self.key).expect("HMAC can take key of any size")
    }

    /// Produce `value.signature`
    pub fn sign(&self, value: &str) -> String {
        let mut mac = self.mac();
        mac.update(value.as_bytes());
        let signature = mac.finalize().into_bytes();
        format!("{}.{}", value, to_base64url(&signature))
    }

    /// Return the embedded value if the signature is valid
    pub fn verify<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (value, signature_b64) = token.split_once('.')?;
        if value.is_empty() || signature_b64.contains('.') {
            return None;
        }

        let signature = from_base64url(signature_b64).ok()?;
        let mut mac = self.mac();
        mac.update(value.as_bytes());
        // verify_slice compares in constant time
        mac.verify_slice(&signature).ok()?;

        Some(value)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").field("key", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_random_token_shape() {
        let token = random_token(32);
        // 32 bytes -> 43 chars of unpadded base64
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(token, random_token(32));
    }

    #[test]
    fn test_base64url_known_value() {
        assert_eq!(to_base64url(&hex::decode("fbff").unwrap()), "-_8");
        assert_eq!(from_base64url("-_8").unwrap(), hex::decode("fbff").unwrap());
    }

    #[test]
    fn test_signer_accepts_own_tokens() {
        let signer = TokenSigner::new([7u8; 32]);
        let token = signer.sign("abc123");
        assert!(token.starts_with("abc123."));
        assert_eq!(signer.verify(&token), Some("abc123"));
    }

    #[test]
    fn test_signer_rejects_tampering() {
        let signer = TokenSigner::new([7u8; 32]);
        let token = signer.sign("abc123");
        let (_, signature) = token.split_once('.').unwrap();

        assert_eq!(signer.verify(&format!("abc124.{signature}")), None);
        assert_eq!(signer.verify("abc123"), None);
        assert_eq!(signer.verify("abc123."), None);
        assert_eq!(signer.verify(&format!(".{signature}")), None);
        assert_eq!(signer.verify("abc123.not*base64"), None);
    }

    #[test]
    fn test_signer_rejects_other_key() {
        let token = TokenSigner::new([1u8; 32]).sign("abc123");
        assert_eq!(TokenSigner::new([2u8; 32]).verify(&token), None);
    }

    #[test]
    fn test_signer_debug_redacts_key() {
        let debug = format!("{:?}", TokenSigner::new([9u8; 32]));
        assert!(debug.contains("REDACTED"));
    }
}
