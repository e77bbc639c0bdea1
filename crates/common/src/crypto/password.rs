//! Password hashing using Argon2id.
//!
//! Hashes are stored in PHC string format (`$argon2id$v=19$...`), so the
//! salt and cost parameters travel with the hash and older hashes keep
//! verifying if the defaults change.
//!
//! ```rust
//! use stillmint_common::crypto::password::{hash_password, verify_password};
//!
//! let stored = hash_password("still as a stone")?;
//! assert!(verify_password("still as a stone", &stored)?);
//! assert!(!verify_password("fidgety", &stored)?);
//! # Ok::<(), stillmint_common::crypto::PasswordHashError>(())
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Error from hashing a password or parsing a stored hash.
pub type PasswordHashError = argon2::password_hash::Error;

/// Hash `password` with a fresh random salt.
///
/// # Errors
/// Returns an error if Argon2 rejects the input (for example a password
/// longer than the algorithm allows).
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a PHC string produced by [`hash_password`].
///
/// A wrong password is `Ok(false)`.
///
/// # Errors
/// Returns an error only when `stored` is not a valid PHC hash.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(other) => Err(other),
    }
}
