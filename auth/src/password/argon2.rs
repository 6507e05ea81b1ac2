use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id digest with default parameters that no password
/// produces. Verifying against it costs as much as a real check.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$jVZTnkRqUB60pobitIwi5A$z3co0qa/78hfca6y5IittBdrTDynrhajNlexEltFF/w";

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash `password` with Argon2id and a fresh random salt.
    ///
    /// The result is a PHC string carrying algorithm, parameters and salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// The digest comparison is constant-time. A stored hash that cannot be
    /// parsed counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Run a full verification that always fails.
    ///
    /// Lets a caller with no stored hash spend the same time as one with a
    /// wrong password.
    pub fn verify_decoy(&self, password: &str) -> bool {
        self.verify(password, DECOY_HASH)
    }
}
