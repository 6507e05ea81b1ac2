use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenType;

/// Issues and verifies typed, expiring bearer tokens.
///
/// Access and refresh tokens differ only in their `type` claim and validity
/// window. Verification fails closed: anything that is not a well-formed,
/// correctly signed, unexpired token of the expected type is rejected.
pub struct TokenCodec {
    jwt_handler: JwtHandler,
    access_validity: Duration,
    refresh_validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec backed by the system clock.
    ///
    /// # Arguments
    /// * `secret` - HS256 signing key
    /// * `access_validity` - Lifetime of access tokens
    /// * `refresh_validity` - Lifetime of refresh tokens
    pub fn new(secret: &[u8], access_validity: Duration, refresh_validity: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            access_validity,
            refresh_validity,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn issue_access_token(&self, user_id: &str) -> Result<String, JwtError> {
        self.issue(user_id, TokenType::Access)
    }

    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, JwtError> {
        self.issue(user_id, TokenType::Refresh)
    }

    /// Sign a new token of `token_type` for `user_id`, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, user_id: &str, token_type: TokenType) -> Result<String, JwtError> {
        let claims = Claims::for_user(
            user_id,
            token_type,
            self.clock.now(),
            self.validity(token_type),
        );
        self.jwt_handler.encode(&claims)
    }

    /// Verify `token` and return the user id it was issued for.
    ///
    /// # Returns
    /// `Some(user_id)` when the signature is valid, the token has not expired
    /// and its type is `expected`; `None` otherwise
    pub fn verify(&self, token: &str, expected: TokenType) -> Option<String> {
        let claims: Claims = self.jwt_handler.decode(token).ok()?;

        if claims.token_type != expected || claims.is_expired(self.clock.now().timestamp()) {
            return None;
        }

        Some(claims.sub)
    }

    pub fn validity(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_validity,
            TokenType::Refresh => self.refresh_validity,
        }
    }

    pub fn access_validity(&self) -> Duration {
        self.access_validity
    }

    /// Lifetime of refresh tokens, used to compute the persisted expiry.
    pub fn refresh_validity(&self) -> Duration {
        self.refresh_validity
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
