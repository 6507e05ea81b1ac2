use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RefreshTokenRecord;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::RefreshTokenRepository;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-memory UserRepository for tests and local runs.
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == *email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id)
        {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        users.remove(id);
        Ok(())
    }
}

/// In-memory RefreshTokenRepository for tests and local runs.
///
/// `rotate` holds the write lock for the whole check-delete-insert step.
/// Writes drop the owner's expired records under the same lock.
#[derive(Default, Clone)]
pub struct InMemoryRefreshTokenRepository {
    records: Arc<RwLock<Vec<RefreshTokenRecord>>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Number of stored records, expired ones included.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn is_match(record: &RefreshTokenRecord, user_id: &UserId, token_hash: &str) -> bool {
    record.user_id == *user_id && record.token_hash == token_hash
}

fn prune_expired(records: &mut Vec<RefreshTokenRecord>, user_id: &UserId, now: DateTime<Utc>) {
    records.retain(|record| !(record.user_id == *user_id && record.is_expired(now)));
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn save(&self, record: RefreshTokenRecord, now: DateTime<Utc>) -> Result<(), UserError> {
        let mut records = self.records.write().await;
        prune_expired(&mut records, &record.user_id, now);
        records.push(record);
        Ok(())
    }

    async fn find_by_user_and_hash(
        &self,
        user_id: &UserId,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, UserError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|record| is_match(record, user_id, token_hash))
            .cloned())
    }

    async fn delete_by_user_and_hash(
        &self,
        user_id: &UserId,
        token_hash: &str,
    ) -> Result<bool, UserError> {
        let mut records = self.records.write().await;
        match records
            .iter()
            .position(|record| is_match(record, user_id, token_hash))
        {
            Some(index) => {
                records.swap_remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rotate(
        &self,
        user_id: &UserId,
        token_hash: &str,
        replacement: RefreshTokenRecord,
        now: DateTime<Utc>,
    ) -> Result<bool, UserError> {
        let mut records = self.records.write().await;
        let live = records
            .iter()
            .position(|record| is_match(record, user_id, token_hash) && !record.is_expired(now));

        match live {
            Some(index) => {
                records.swap_remove(index);
                prune_expired(&mut records, user_id, now);
                records.push(replacement);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<u64, UserError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.user_id != *user_id);
        Ok((before - records.len()) as u64)
    }
}
