//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-512, HMAC, random tokens, Base64)
//! - Salted SHA-512 pass-hashes
//! - Cookie management
//! - Object cache backends (Redis, in-process)

pub mod cache;
pub mod cookie;
pub mod crypto;
pub mod password;
