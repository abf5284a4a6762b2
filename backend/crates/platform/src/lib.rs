//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Cryptographic utilities (random bytes, opaque url-safe tokens)
//! - Password hashing (Argon2id, zeroized clear-text handling)
//! - Client metadata extraction (IP, device identifier)
//! - Outbound mail port

pub mod client;
pub mod crypto;
pub mod mail;
pub mod password;
