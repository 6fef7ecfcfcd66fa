//! Shared utilities and common types for the Device Registry backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (session token generation, hashing)
//! - Password hashing with Argon2id
//! - Common validation logic (slug names, future dates)
//! - Cursor pagination for data history listings

pub mod crypto;
pub mod pagination;
pub mod password;
pub mod validation;
