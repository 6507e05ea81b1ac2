use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// PostgreSQL implementation of UserRepository.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: PgRow) -> Result<User, UserError> {
        Ok(User {
            id: UserId(row.get("id")),
            email: EmailAddress::new(row.get("email"))?,
            password_hash: row.get("password_hash"),
            user_name: row.get("user_name"),
            image_uri: row.get("image_uri"),
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, user_name, image_uri, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, user_name, image_uri, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_user).transpose()
    }

    async fn save(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, user_name, image_uri, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                user_name = EXCLUDED.user_name,
                image_uri = EXCLUDED.image_uri
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.user_name)
        .bind(&user.image_uri)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        tracing::debug!(user_id = %user.id, "User saved");
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            tracing::warn!(user_id = %id, "User not found for deletion");
        }

        Ok(())
    }
}
