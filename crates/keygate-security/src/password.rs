//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

/// Password hashing capability consumed by the auth service
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Hashes new passwords with Argon2id and verifies Argon2 or legacy bcrypt hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    fn is_bcrypt(hash: &str) -> bool {
        hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$")
    }
}

impl PasswordHasher for PasswordService {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::is_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::HashError(e.to_string()));
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
