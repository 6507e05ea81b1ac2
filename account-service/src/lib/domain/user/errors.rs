use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format.")]
    InvalidFormat,
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be at least 9 characters long and contain at least one digit, uppercase and lowercase character.")]
    TooWeak,
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0}")]
    WeakPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("A user with that email already exists.")]
    EmailAlreadyExists(String),

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Email not registered.")]
    EmailNotRegistered,

    #[error("Problems while updating, try again.")]
    ProfileUpdateFailed,

    #[error("Invalid refresh token.")]
    InvalidRefreshToken,

    #[error("Refresh token not recognized (maybe used or expired?)")]
    RefreshTokenNotRecognized,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::PasswordHashing(err.to_string())
    }
}

impl From<auth::JwtError> for UserError {
    fn from(err: auth::JwtError) -> Self {
        UserError::TokenIssuance(err.to_string())
    }
}

impl From<auth::AuthenticationError> for UserError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => e.into(),
            auth::AuthenticationError::JwtError(e) => e.into(),
        }
    }
}
