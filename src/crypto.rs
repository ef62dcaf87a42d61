//! Cryptographic logics.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::ServerError;

#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    #[error("argon2 error: {0}")]
    Argon2(String),
}

/// Password manager that uses Argon2id and PHC string format for hashing and
/// verification.
#[derive(Clone, Copy, Default)]
pub struct PasswordManager;

impl PasswordManager {
    /// Hash password using Argon2id.
    pub fn hash_password(&self, password: impl AsRef<[u8]>) -> Result<String, CryptoError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_ref(), &salt)
            .map_err(|e| CryptoError::Argon2(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify password against a PHC string.
    ///
    /// Every failure is reported as the same `Invalid credentials` error,
    /// whether the stored hash is unreadable or the password does not match.
    pub fn verify_password(
        &self,
        password: impl AsRef<[u8]>,
        phc_hash: &str,
    ) -> Result<(), ServerError> {
        let parsed = PasswordHash::new(phc_hash)
            .map_err(|_| ServerError::Unauthorized("Invalid credentials"))?;

        Argon2::default()
            .verify_password(password.as_ref(), &parsed)
            .map_err(|_| ServerError::Unauthorized("Invalid credentials"))
    }
}
