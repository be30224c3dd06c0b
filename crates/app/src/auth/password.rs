//! Password hashing.
//!
//! bcrypt is CPU bound, so both operations run on the blocking pool.

use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};
use zeroize::Zeroizing;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed")]
    Join(#[from] JoinError),
}

/// Hash a password with the given bcrypt cost.
///
/// # Errors
///
/// Returns an error if the cost is out of range or the blocking task panics.
pub async fn hash_password(password: Zeroizing<String>, cost: u32) -> Result<String, PasswordError> {
    let hash = spawn_blocking(move || bcrypt::hash(password.as_bytes(), cost)).await??;

    Ok(hash)
}

/// Check a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed or the blocking task panics.
pub async fn verify_password(
    password: Zeroizing<String>,
    hash: String,
) -> Result<bool, PasswordError> {
    let valid = spawn_blocking(move || bcrypt::verify(password.as_bytes(), &hash)).await??;

    Ok(valid)
}
