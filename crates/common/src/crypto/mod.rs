//! Cryptographic helpers.
//!
//! - **[`password`]**: Argon2id hashing and verification for login passwords

pub mod password;

pub use password::{hash_password, verify_password, PasswordHashError};
