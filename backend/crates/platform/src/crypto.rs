//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate an opaque url-safe token with `len` bytes of entropy.
///
/// Callers pick the entropy: refresh tokens use 48 bytes (384 bits),
/// email verification tokens use 32 bytes.
pub fn random_urlsafe_token(len: usize) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes(len))
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

        assert_eq!(random_bytes(0).len(), 0);
    }

    #[test]
    fn test_random_urlsafe_token() {
        let token = random_urlsafe_token(48);
        // 48 bytes -> 64 base64url characters, no padding
        assert_eq!(token.len(), 64);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));

        let other = random_urlsafe_token(48);
        assert_ne!(token, other);
    }

    #[test]
    fn test_random_urlsafe_token_entropy_scales() {
        // 32 bytes -> ceil(32 * 4 / 3) = 43 characters unpadded
        assert_eq!(random_urlsafe_token(32).len(), 43);
    }
}
