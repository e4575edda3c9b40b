//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the gateway:
//! - Cryptographic utilities (random tokens, SHA-256, HMAC-signed values)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)
//! - Cookie header building and parsing

pub mod cookie;
pub mod crypto;
pub mod password;
