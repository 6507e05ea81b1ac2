use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RefreshTokenRecord;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::ResetPasswordCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for account and session operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Returns
    /// Created user entity (no tokens are issued)
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Verify credentials and open a session.
    ///
    /// # Returns
    /// User profile with a new access/refresh pair
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;

    /// Revoke every outstanding refresh token of the account.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email is not registered
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, email: &EmailAddress) -> Result<(), UserError>;

    /// Redeem a refresh token for a new pair. Each refresh token redeems once.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Bad signature, expired, wrong type, or owner gone
    /// * `RefreshTokenNotRecognized` - Already redeemed, revoked or never stored
    /// * `DatabaseError` - Database operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, UserError>;

    /// Replace the password of a registered account.
    ///
    /// # Errors
    /// * `EmailNotRegistered` - No account with this email
    /// * `PasswordHashing` - Password could not be hashed
    /// * `DatabaseError` - Database operation failed
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), UserError>;

    /// Overwrite display name and avatar.
    ///
    /// # Errors
    /// * `ProfileUpdateFailed` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(&self, command: UpdateProfileCommand) -> Result<User, UserError>;

    /// Update profile fields and optionally the password, then issue a new pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No account with this email
    /// * `PasswordHashing` - Password could not be hashed
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, command: UpdateUserCommand) -> Result<AuthSession, UserError>;

    /// Delete the account and its refresh tokens.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, email: &EmailAddress) -> Result<(), UserError>;

    /// Signature, expiry and type check only; never touches storage.
    fn is_access_token_valid(&self, token: &str) -> bool;

    /// Signature, expiry and type check only. Does not tell whether the
    /// token was already redeemed.
    fn is_refresh_token_valid(&self, token: &str) -> bool;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by normalized email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Insert a new user or replace the stored user with the same id.
    ///
    /// # Returns
    /// Saved user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email belongs to a different id
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage. Removing a missing user is not an error.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for issued refresh tokens.
///
/// Records are keyed by owner and token fingerprint; raw tokens never reach
/// this port.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Store a newly issued refresh token.
    ///
    /// Records of the same owner that have expired at `now` are dropped in the
    /// same step; they can no longer be redeemed.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, record: RefreshTokenRecord, now: DateTime<Utc>) -> Result<(), UserError>;

    /// Look up a record by owner and fingerprint, expired or not.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_user_and_hash(
        &self,
        user_id: &UserId,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, UserError>;

    /// Delete a record by owner and fingerprint.
    ///
    /// # Returns
    /// Whether a record was deleted
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_user_and_hash(
        &self,
        user_id: &UserId,
        token_hash: &str,
    ) -> Result<bool, UserError>;

    /// Atomically redeem `token_hash` and store `replacement`.
    ///
    /// Deletes the record of `user_id` with `token_hash` if it expires after
    /// `now`, and inserts `replacement` in the same step. Other records of
    /// `user_id` expired at `now` are dropped with it. When no such record
    /// exists nothing is written. Of several concurrent calls with the same
    /// hash at most one returns true.
    ///
    /// # Returns
    /// Whether the old record was redeemed
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn rotate(
        &self,
        user_id: &UserId,
        token_hash: &str,
        replacement: RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> Result<bool, UserError>;

    /// Delete every record owned by `user_id`.
    ///
    /// # Returns
    /// Number of deleted records
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, UserError>;
}
