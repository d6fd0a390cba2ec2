//! Password Hashing
//!
//! Credential hashing seam plus the default Argon2id implementation and the
//! policy applied before a plaintext ever reaches the hasher.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;

use crate::error::{AccountsError, Result, ValidationDetail};

/// Credential hashing seam.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext into an opaque, self-describing string.
    fn hash(&self, password: &str) -> Result<String>;

    /// Verify a plaintext against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with the crate's default parameters, PHC string output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AccountsError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Rules applied to plaintexts before hashing.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    pub fn check(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.min_length {
            return Err(AccountsError::validation_with(
                "password does not meet policy",
                [ValidationDetail::format(
                    "password",
                    format!("password must be at least {} characters", self.min_length),
                )],
            ));
        }
        Ok(())
    }
}
