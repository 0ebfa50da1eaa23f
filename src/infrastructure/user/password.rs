//! Password hashing with Argon2

use std::fmt::Debug;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use once_cell::sync::Lazy;

use crate::domain::DomainError;

/// Hash used to burn comparable time when the email is unknown
static DECOY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"decoy-password", &salt)
        .ok()
        .map(|h| h.to_string())
});

pub trait PasswordHasher: Send + Sync + Debug {
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    fn verify(&self, password: &str, hash: &str) -> bool;

    /// Run a verification that always fails, so unknown accounts cost as much
    /// as a wrong password
    fn verify_decoy(&self, password: &str) {
        if let Some(hash) = DECOY_HASH.as_deref() {
            let _ = self.verify(password, hash);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("correct horse battery").unwrap();

        assert!(hasher.verify("correct horse battery", &hash));
        assert!(!hasher.verify("wrong password", &hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2"));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("anything", "not-a-phc-string"));
        hasher.verify_decoy("anything");
    }
}
