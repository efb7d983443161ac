//! # auth-adapters
//!
//! Argon2-based implementation of `PasswordHasher`.
//! Stored passwords are PHC strings (`$argon2id$v=19$...`) carrying their
//! own salt and parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use domains::{DomainError, PasswordHasher, Result};
use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::Storage(format!("hashing password: {e}")))
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    /// Unparsable hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(err) => {
                warn!(error = %err, "stored password hash is not a PHC string");
                return false;
            }
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("hunter2").unwrap();
        let second = hasher.hash("hunter2").unwrap();
        assert!(first.starts_with("$argon2"));
        assert_ne!(first, second);
        assert!(hasher.verify("hunter2", &first));
        assert!(!hasher.verify("hunter3", &first));
    }

    #[test]
    fn plain_text_hash_never_matches() {
        assert!(!Argon2Hasher::new().verify("pw", "pw"));
    }
}
