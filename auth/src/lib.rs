//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the account service:
//! - Password hashing (Argon2id)
//! - Credential format rules
//! - Typed access/refresh JWTs with a pluggable clock
//! - Refresh token fingerprints for storage
//!
//! Storage and transport live in the service; nothing here performs I/O.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("My_password1").unwrap();
//! assert!(hasher.verify("My_password1", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenCodec, TokenType};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(30),
//! );
//! let token = codec.issue_access_token("user123").unwrap();
//! assert_eq!(codec.verify(&token, TokenType::Access), Some("user123".to_string()));
//! assert_eq!(codec.verify(&token, TokenType::Refresh), None);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenCodec};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(30),
//! ));
//!
//! // Register: hash password
//! let hash = auth.hash_password("Password123").unwrap();
//!
//! // Login: verify and issue tokens
//! let pair = auth.authenticate("Password123", &hash, "user123").unwrap();
//! println!("Access token: {}", pair.access_token);
//! ```

pub mod authenticator;
pub mod clock;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::fingerprint;
pub use token::TokenCodec;
