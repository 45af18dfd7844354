//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, HMAC-signed tokens, Base64)
//! - Password hashing (Argon2id)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
