//! Password policy and hashing.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;
use uuid::Uuid;

use super::PasswordError;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// A plaintext password that satisfied the policy.
///
/// Never printed; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn parse(value: &str) -> Result<Self, PasswordError> {
        if value.is_empty() {
            return Err(PasswordError::NullOrEmpty);
        }
        if value.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if !value.chars().any(|c| c.is_uppercase()) {
            return Err(PasswordError::MissingUppercaseLetter);
        }
        if !value.chars().any(|c| c.is_lowercase()) {
            return Err(PasswordError::MissingLowercaseLetter);
        }
        if !value.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordError::MissingDigit);
        }
        if value.chars().all(|c| c.is_alphanumeric()) {
            return Err(PasswordError::MissingNonAlphaNumeric);
        }
        Ok(Self(value.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Hashing failed. Fatal for the current use case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(String);

impl From<argon2::password_hash::Error> for HashError {
    fn from(e: argon2::password_hash::Error) -> Self {
        HashError(e.to_string())
    }
}

/// Turns plaintext passwords into stored hashes and checks them.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// `false` for a wrong password and for a hash that cannot be parsed.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

/// Argon2id, stored as a PHC string.
///
/// Verification reads the cost parameters from the stored hash, so hashes
/// made with other parameters keep verifying after they change.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())?;
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
