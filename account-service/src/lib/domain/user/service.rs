use std::sync::Arc;

use async_trait::async_trait;
use auth::fingerprint;
use auth::Authenticator;
use auth::TokenPair;
use auth::TokenType;

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
use crate::user::ports::AuthServicePort;
use crate::user::ports::RefreshTokenRepository;
use crate::user::ports::UserRepository;

/// Domain service implementation for account and session operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: Arc<RR>,
    authenticator: Arc<Authenticator>,
}

impl<UR, RR> AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(users: Arc<UR>, refresh_tokens: Arc<RR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            users,
            refresh_tokens,
            authenticator,
        }
    }

    async fn find_user(&self, email: &EmailAddress, missing: UserError) -> Result<User, UserError> {
        self.users.find_by_email(email).await?.ok_or(missing)
    }

    async fn open_session(&self, user: User) -> Result<AuthSession, UserError> {
        let tokens = self.authenticator.issue_token_pair(&user.id.to_string())?;
        self.store_refresh_token(user.id, &tokens).await?;
        Ok(AuthSession::new(user, tokens))
    }

    async fn store_refresh_token(&self, user_id: UserId, tokens: &TokenPair) -> Result<(), UserError> {
        self.refresh_tokens
            .save(
                RefreshTokenRecord::for_pair(user_id, tokens),
                self.authenticator.now(),
            )
            .await
    }
}

#[async_trait]
impl<UR, RR> AuthServicePort for AuthService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.authenticator.hash_password(command.password.as_str())?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            user_name: command.user_name,
            image_uri: command.image_uri,
            created_at: self.authenticator.now(),
        };

        let created_user = self.users.save(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        if !auth::credentials::is_valid_password(&command.password) {
            return Err(UserError::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_email(&command.email).await? else {
            return Err(self.authenticator.reject_unknown(&command.password).into());
        };

        let tokens = self.authenticator.authenticate(
            &command.password,
            &user.password_hash,
            &user.id.to_string(),
        )?;
        self.store_refresh_token(user.id, &tokens).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthSession::new(user, tokens))
    }

    async fn logout(&self, email: &EmailAddress) -> Result<(), UserError> {
        let user = self.find_user(email, UserError::InvalidCredentials).await?;

        let revoked = self.refresh_tokens.delete_all_for_user(&user.id).await?;
        tracing::info!(user_id = %user.id, revoked, "User logged out");

        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, UserError> {
        let subject = self
            .authenticator
            .verify_token(refresh_token, TokenType::Refresh)
            .ok_or(UserError::InvalidRefreshToken)?;
        let user_id = UserId::from_string(&subject).map_err(|_| UserError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(UserError::InvalidRefreshToken)?;

        let tokens = self.authenticator.issue_token_pair(&user.id.to_string())?;
        let redeemed = self
            .refresh_tokens
            .rotate(
                &user.id,
                &fingerprint(refresh_token),
                RefreshTokenRecord::for_pair(user.id, &tokens),
                self.authenticator.now(),
            )
            .await?;

        if !redeemed {
            tracing::warn!(user_id = %user.id, "Refresh token reuse or unknown token rejected");
            return Err(UserError::RefreshTokenNotRecognized);
        }

        Ok(AuthSession::new(user, tokens))
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), UserError> {
        let mut user = self
            .find_user(&command.email, UserError::EmailNotRegistered)
            .await?;

        user.password_hash = self.authenticator.hash_password(command.password.as_str())?;
        let user = self.users.save(user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    async fn update_profile(&self, command: UpdateProfileCommand) -> Result<User, UserError> {
        let mut user = self
            .find_user(&command.email, UserError::ProfileUpdateFailed)
            .await?;

        user.user_name = command.user_name;
        user.image_uri = command.image_uri;

        self.users.save(user).await
    }

    async fn update_user(&self, command: UpdateUserCommand) -> Result<AuthSession, UserError> {
        let mut user = self
            .find_user(&command.email, UserError::InvalidCredentials)
            .await?;

        if let Some(new_password) = command.password {
            user.password_hash = self.authenticator.hash_password(new_password.as_str())?;
        }
        user.user_name = command.user_name;
        user.image_uri = command.image_uri;

        let updated_user = self.users.save(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        self.open_session(updated_user).await
    }

    async fn delete_user(&self, email: &EmailAddress) -> Result<(), UserError> {
        let user = self.find_user(email, UserError::InvalidCredentials).await?;

        self.refresh_tokens.delete_all_for_user(&user.id).await?;
        self.users.delete(&user.id).await?;

        tracing::info!(user_id = %user.id, "User deleted");
        Ok(())
    }

    fn is_access_token_valid(&self, token: &str) -> bool {
        self.authenticator.is_token_valid(token, TokenType::Access)
    }

    fn is_refresh_token_valid(&self, token: &str) -> bool {
        self.authenticator.is_token_valid(token, TokenType::Refresh)
    }
}
