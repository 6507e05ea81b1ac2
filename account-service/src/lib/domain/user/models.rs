use std::fmt;

use auth::credentials;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered account. The id is stable for the account's
/// lifetime; every other field may change in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub user_name: String,
    pub image_uri: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed and lower-cased on construction, so two addresses that differ only
/// in case or surrounding whitespace identify the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Errors
    /// * `InvalidFormat` - Email is not shaped like `local@domain.tld`
    pub fn new(email: String) -> Result<Self, EmailError> {
        if !credentials::is_valid_email(&email) {
            return Err(EmailError::InvalidFormat);
        }
        Ok(Self(email.trim().to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the strength policy.
///
/// Only lives long enough to be hashed. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `TooWeak` - Fewer than 9 characters, or missing a lowercase letter,
    ///   an uppercase letter or a digit
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if !credentials::is_valid_password(&password) {
            return Err(PasswordPolicyError::TooWeak);
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Persisted refresh token: fingerprint of the raw token plus its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(user_id: UserId, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token_hash,
            expires_at,
        }
    }

    /// Record for the refresh half of a freshly issued pair.
    pub fn for_pair(user_id: UserId, tokens: &TokenPair) -> Self {
        Self::new(user_id, tokens.refresh_fingerprint(), tokens.refresh_expires_at)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Authenticated user together with a newly issued token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthSession {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Command to register a new account
#[derive(Debug)]
pub struct RegisterCommand {
    pub user_name: String,
    pub email: EmailAddress,
    pub password: Password,
    pub image_uri: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `user_name` - Display name
    /// * `email` - Validated email address
    /// * `password` - Policy-checked password (will be hashed by service)
    /// * `image_uri` - Avatar reference
    pub fn new(user_name: String, email: EmailAddress, password: Password, image_uri: String) -> Self {
        Self {
            user_name,
            email,
            password,
            image_uri,
        }
    }
}

/// Command to log in.
///
/// The password is kept raw: a value that fails the strength policy simply
/// cannot match and is reported as invalid credentials.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

/// Command to replace the password of a registered email
#[derive(Debug)]
pub struct ResetPasswordCommand {
    pub email: EmailAddress,
    pub password: Password,
}

/// Command to overwrite display name and avatar
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub email: EmailAddress,
    pub user_name: String,
    pub image_uri: String,
}

/// Command to update profile fields and optionally the password.
///
/// `password: None` keeps the current hash.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub email: EmailAddress,
    pub user_name: String,
    pub image_uri: String,
    pub password: Option<Password>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Ann@X.com ".to_string()).unwrap();
        assert_eq!(email.as_str(), "ann@x.com");
        assert_eq!(email, EmailAddress::new("ann@x.com".to_string()).unwrap());
    }

    #[test]
    fn test_email_rejects_bad_format() {
        assert_eq!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat)
        );
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("Abcdefg1!".to_string()).is_ok());
        assert_eq!(
            Password::new("wrong".to_string()),
            Err(PasswordPolicyError::TooWeak)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("Abcdefg1!".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("Abcdefg1!"));
    }

    #[test]
    fn test_user_id_round_trip() {
        let id = UserId::new();
        assert_eq!(UserId::from_string(&id.to_string()), Ok(id));
        assert!(UserId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_refresh_record_expiry() {
        let now = Utc::now();
        let record = RefreshTokenRecord::new(UserId::new(), "hash".to_string(), now);

        assert!(record.is_expired(now));
        assert!(!record.is_expired(now - chrono::Duration::seconds(1)));
    }
}
