use argon2::password_hash::{PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// One-way password hashing (salted Argon2, PHC string output).
#[derive(Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Fresh random salt per call, so equal plaintexts never share a hash.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// A stored hash that fails to parse counts as a mismatch, never an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default().verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}
