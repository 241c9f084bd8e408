//! Argon2id hashing for operator passwords

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,

    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    /// Pinned to Argon2id v19 so stored hashes do not depend on crate defaults.
    fn hasher() -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
    }

    /// PHC string (`$argon2id$v=19$...`) with a fresh random salt.
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let salt = SaltString::generate(&mut OsRng);
        Self::hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// `Ok(false)` on a wrong password. Unreadable or unsupported stored
    /// hashes are errors, so a corrupt users row is not reported as a typo.
    pub fn verify(password: &str, stored: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(stored).map_err(|e| PasswordError::HashError(e.to_string()))?;

        match Self::hasher().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashError(e.to_string())),
        }
    }
}
