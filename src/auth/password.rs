use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

use crate::error::{Error, Result};

/// Hash a plaintext password into a self-describing PHC string.
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            Error::Hashing(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// `Ok(())` when `plain` matches `hash`, `Error::Authentication` otherwise.
pub fn verify_password(plain: &str, hash: &str) -> Result<()> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        warn!(error = %e, "stored password hash is not a valid PHC string");
        Error::Authentication
    })?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|_| Error::Authentication)
}

/// `hash_password` on the blocking pool, keeping Argon2 off the async workers.
pub async fn hash_password_blocking(plain: &str) -> Result<String> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| {
            error!(error = %e, "spawn_blocking join error");
            Error::Hashing(e.to_string())
        })?
}

/// `verify_password` on the blocking pool.
pub async fn verify_password_blocking(plain: &str, hash: &str) -> Result<()> {
    let (plain, hash) = (plain.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| {
            error!(error = %e, "spawn_blocking join error");
            Error::Hashing(e.to_string())
        })?
}
