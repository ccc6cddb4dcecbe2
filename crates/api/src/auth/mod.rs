//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 access-token generation and validation.
//! - [`session`] -- revocation list for logged-out tokens.

pub mod jwt;
pub mod password;
pub mod session;
