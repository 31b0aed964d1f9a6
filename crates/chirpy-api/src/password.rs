//! Argon2id password hashing and verification.
//!
//! Hashes are PHC strings, so the algorithm parameters and salt travel with
//! the hash. The work factor is the crate default and never varies per call.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use chirpy_types::error::{CoreError, CoreResult};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::Internal(format!("hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC hash.
///
/// A mismatch is `Unauthorized`; a hash that cannot be parsed is `Internal`.
pub fn verify_password(password: &str, hash: &str) -> CoreResult<()> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CoreError::Internal(format!("parse password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => Err(CoreError::unauthorized("password mismatch")),
        Err(e) => Err(CoreError::Internal(format!("verify password: {}", e))),
    }
}
