//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random bytes, hex)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Single-use token generation and fingerprinting

pub mod crypto;
pub mod password;
pub mod token;
