//! Single-Use Token Generation and Fingerprinting
//!
//! Opaque tokens for email verification, magic links and password
//! resets. Two distinct one-way functions are involved:
//!
//! - [`generate`] produces an unguessable random token, hex-encoded so
//!   it survives URL transport without escaping.
//! - [`fingerprint`] produces a *deterministic* SHA-256 digest of a
//!   token, usable as an O(1) lookup key. Reset tokens are persisted
//!   only as their fingerprint, never as plaintext.
//!
//! Deterministic fingerprinting is the opposite requirement from
//! password hashing, which must be salted per call - see
//! [`crate::password`].

use crate::crypto::{random_bytes, sha256};

/// Token entropy in bytes before encoding
pub const TOKEN_BYTES: usize = 32;

/// Length of a generated token in hex characters
pub const TOKEN_HEX_LENGTH: usize = TOKEN_BYTES * 2;

/// Generate a new opaque token (32 random bytes, hex-encoded)
pub fn generate() -> String {
    hex::encode(random_bytes(TOKEN_BYTES))
}

/// Deterministic SHA-256 fingerprint of a token, hex-encoded
///
/// Same token always yields the same fingerprint.
pub fn fingerprint(token: &str) -> String {
    hex::encode(sha256(token.as_bytes()))
}
