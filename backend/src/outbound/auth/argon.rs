//! Argon2id adapter for the `PasswordHasher` port.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with
//! each hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id with the crate's default parameters.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|err| PasswordHashError::hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_verify_against_their_password() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("hunter22").expect("hash");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("hunter22", &hash).expect("verify"));
        assert!(!hasher.verify("hunter23", &hash).expect("verify"));
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("same").expect("hash");
        let second = hasher.hash("same").expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn malformed_hashes_are_errors() {
        let hasher = Argon2PasswordHasher::new();
        assert!(hasher.verify("anything", "not-a-phc-string").is_err());
    }
}
