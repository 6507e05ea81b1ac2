use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Row;
use sqlx::Transaction;

use crate::domain::user::models::RefreshTokenRecord;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::RefreshTokenRepository;
use crate::user::errors::UserError;

/// PostgreSQL implementation of RefreshTokenRepository.
///
/// Rotation runs in a transaction: the conditional DELETE takes the row lock,
/// so a concurrent redemption of the same token waits and then finds no row.
/// Every write also drops the owner's expired records.
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    /// Create a new PostgreSQL refresh token repository.
    ///
    /// # Arguments
    /// * `pool` - PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        record: &RefreshTokenRecord,
    ) -> Result<(), UserError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.user_id.0)
        .bind(&record.token_hash)
        .bind(record.expires_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn prune_expired(
        tx: &mut Transaction<'_, Postgres>,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<u64, UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1 AND expires_at <= $2
            "#,
        )
        .bind(user_id.0)
        .bind(now)
        .execute(&mut **tx)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    fn row_to_record(row: PgRow) -> RefreshTokenRecord {
        RefreshTokenRecord::new(
            UserId(row.get("user_id")),
            row.get("token_hash"),
            row.get("expires_at"),
        )
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn save(&self, record: RefreshTokenRecord, now: DateTime<Utc>) -> Result<(), UserError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let pruned = Self::prune_expired(&mut tx, &record.user_id, now).await?;
        Self::insert(&mut tx, &record).await?;

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if pruned > 0 {
            tracing::debug!(user_id = %record.user_id, pruned, "Expired refresh tokens pruned");
        }
        Ok(())
    }

    async fn find_by_user_and_hash(
        &self,
        user_id: &UserId,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, token_hash, expires_at
            FROM refresh_tokens
            WHERE user_id = $1 AND token_hash = $2
            "#,
        )
        .bind(user_id.0)
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.map(Self::row_to_record))
    }

    async fn delete_by_user_and_hash(
        &self,
        user_id: &UserId,
        token_hash: &str,
    ) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1 AND token_hash = $2
            "#,
        )
        .bind(user_id.0)
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn rotate(
        &self,
        user_id: &UserId,
        token_hash: &str,
        replacement: RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> Result<bool, UserError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        let redeemed = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1 AND token_hash = $2 AND expires_at > $3
            "#,
        )
        .bind(user_id.0)
        .bind(token_hash)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if redeemed.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;
            return Ok(false);
        }

        Self::prune_expired(&mut tx, user_id, now).await?;
        Self::insert(&mut tx, &replacement).await?;

        tx.commit()
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        tracing::debug!(user_id = %user_id, "Refresh token rotated");
        Ok(true)
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
