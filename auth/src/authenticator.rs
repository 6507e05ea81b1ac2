use chrono::DateTime;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::TokenType;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::fingerprint;
use crate::token::TokenCodec;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Freshly issued access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Instant at which `refresh_token` stops being redeemable
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Storage fingerprint of the refresh token.
    pub fn refresh_fingerprint(&self) -> String {
        fingerprint(&self.refresh_token)
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `token_codec` - Configured codec used for issuing and verifying tokens
    pub fn new(token_codec: TokenCodec) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Subject of the issued tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair(user_id)?)
    }

    /// Fail authentication for an account that does not exist.
    ///
    /// Runs a full password verification first so the response takes as
    /// long as a wrong password.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_decoy(password);
        AuthenticationError::InvalidCredentials
    }

    /// Issue an access/refresh pair without password verification.
    ///
    /// Used for refresh flows or when authentication has already been
    /// established by other means.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, user_id: &str) -> Result<TokenPair, JwtError> {
        let issued_at = self.token_codec.now();

        Ok(TokenPair {
            access_token: self.token_codec.issue_access_token(user_id)?,
            refresh_token: self.token_codec.issue_refresh_token(user_id)?,
            refresh_expires_at: issued_at + self.token_codec.refresh_validity(),
        })
    }

    /// Verify a token of the expected type and return its subject.
    pub fn verify_token(&self, token: &str, expected: TokenType) -> Option<String> {
        self.token_codec.verify(token, expected)
    }

    pub fn is_token_valid(&self, token: &str, expected: TokenType) -> bool {
        self.verify_token(token, expected).is_some()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.token_codec.now()
    }
}
