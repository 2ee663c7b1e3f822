//! Argon2id password hashing.
//!
//! Hashing is CPU-bound, so the async wrappers move the work onto Tokio's blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,
    #[error("password hashing failed")]
    Hash,
    #[error("password worker failed: {0}")]
    Worker(String),
}

/// Hash a password using Argon2id. Returns a PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a PHC string. An unparsable hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Checks the length policy, then hashes on the blocking pool.
pub async fn hash_secret(password: SecretString) -> Result<String, PasswordError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    tokio::task::spawn_blocking(move || hash_password(password.expose_secret()))
        .await
        .map_err(|e| PasswordError::Worker(e.to_string()))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_secret(password: SecretString, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(password.expose_secret(), &hash))
        .await
        .map_err(|e| PasswordError::Worker(e.to_string()))
}
