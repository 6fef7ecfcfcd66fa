//! Cryptographic utilities for session token generation and hashing.
//!
//! Session tokens are opaque random strings handed to the client at login.
//! Only the SHA-256 hash is persisted, so a database leak does not expose
//! usable credentials.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix carried by every session token, useful for secret scanning.
pub const SESSION_TOKEN_PREFIX: &str = "drs_";

/// Number of random bytes in a generated token.
const TOKEN_BYTES: usize = 32;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates a new opaque token with the session prefix.
///
/// 32 bytes of OS randomness, hex encoded. The caller stores
/// `sha256_hex(&token)` and returns the token itself to the client once.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("{}{}", SESSION_TOKEN_PREFIX, hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        // SHA256 of empty string
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
    }

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert!(token.starts_with(SESSION_TOKEN_PREFIX));
        // prefix + 64 hex chars
        assert_eq!(token.len(), SESSION_TOKEN_PREFIX.len() + TOKEN_BYTES * 2);
    }

    #[test]
    fn test_generate_token_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
