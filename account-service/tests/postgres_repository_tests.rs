//! Repository tests against a live PostgreSQL instance.
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a server
//! that allows creating databases.

mod common;

use std::sync::Arc;

use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::RefreshTokenRecord;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::RefreshTokenRepository;
use account_service::domain::user::ports::UserRepository;
use account_service::outbound::repositories::PostgresRefreshTokenRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::user::errors::UserError;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;
use common::TestDb;

fn user(email: &str) -> User {
    User {
        id: UserId::new(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "$argon2id$placeholder".to_string(),
        user_name: "Ann".to_string(),
        image_uri: "content://avatars/ann.png".to_string(),
        // Postgres keeps microseconds
        created_at: Utc::now().trunc_subsecs(6),
    }
}

#[tokio::test]
#[ignore]
async fn test_user_save_find_and_delete() {
    let db = TestDb::new().await;
    let repository = PostgresUserRepository::new(db.pool.clone());

    let mut ann = repository.save(user("ann@x.com")).await.unwrap();
    assert_eq!(
        repository.find_by_email(&ann.email).await.unwrap(),
        Some(ann.clone())
    );

    ann.user_name = "Annie".to_string();
    repository.save(ann.clone()).await.unwrap();
    assert_eq!(repository.find_by_id(&ann.id).await.unwrap(), Some(ann.clone()));

    let err = repository.save(user("ann@x.com")).await.unwrap_err();
    assert!(matches!(err, UserError::EmailAlreadyExists(_)));

    repository.delete(&ann.id).await.unwrap();
    assert!(repository.find_by_id(&ann.id).await.unwrap().is_none());
    assert!(repository.delete(&ann.id).await.is_ok());
}

#[tokio::test]
#[ignore]
async fn test_refresh_token_rotation_is_single_use() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let refresh_tokens = Arc::new(PostgresRefreshTokenRepository::new(db.pool.clone()));

    let ann = users.save(user("ann@x.com")).await.unwrap();
    let now = Utc::now();
    let expires_at = now + Duration::days(30);
    refresh_tokens
        .save(RefreshTokenRecord::new(ann.id, "old".to_string(), expires_at), now)
        .await
        .unwrap();

    let attempts = (0..4).map(|i| {
        let refresh_tokens = Arc::clone(&refresh_tokens);
        let user_id = ann.id;
        tokio::spawn(async move {
            refresh_tokens
                .rotate(
                    &user_id,
                    "old",
                    RefreshTokenRecord::new(user_id, format!("new-{}", i), expires_at),
                    now,
                )
                .await
                .unwrap()
        })
    });

    let results = futures::future::join_all(attempts).await;
    let winners = results.into_iter().filter(|r| *r.as_ref().unwrap()).count();
    assert_eq!(winners, 1);
    assert!(refresh_tokens
        .find_by_user_and_hash(&ann.id, "old")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn test_deleting_user_cascades_to_refresh_tokens() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let refresh_tokens = PostgresRefreshTokenRepository::new(db.pool.clone());

    let ann = users.save(user("ann@x.com")).await.unwrap();
    let now = Utc::now();
    let expires_at = now + Duration::days(30);
    refresh_tokens
        .save(RefreshTokenRecord::new(ann.id, "a1".to_string(), expires_at), now)
        .await
        .unwrap();

    users.delete(&ann.id).await.unwrap();

    assert!(refresh_tokens
        .find_by_user_and_hash(&ann.id, "a1")
        .await
        .unwrap()
        .is_none());
    assert_eq!(refresh_tokens.delete_all_for_user(&ann.id).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn test_refresh_token_writes_drop_expired_records() {
    let db = TestDb::new().await;
    let users = PostgresUserRepository::new(db.pool.clone());
    let refresh_tokens = PostgresRefreshTokenRepository::new(db.pool.clone());

    let ann = users.save(user("ann@x.com")).await.unwrap();
    let now = Utc::now();
    refresh_tokens
        .save(RefreshTokenRecord::new(ann.id, "a1".to_string(), now), now)
        .await
        .unwrap();

    let later = now + Duration::days(1);
    let expires_at = later + Duration::days(30);
    refresh_tokens
        .save(RefreshTokenRecord::new(ann.id, "a2".to_string(), expires_at), later)
        .await
        .unwrap();
    assert!(refresh_tokens
        .find_by_user_and_hash(&ann.id, "a1")
        .await
        .unwrap()
        .is_none());

    refresh_tokens
        .save(RefreshTokenRecord::new(ann.id, "stale".to_string(), later), now)
        .await
        .unwrap();
    assert!(refresh_tokens
        .rotate(
            &ann.id,
            "a2",
            RefreshTokenRecord::new(ann.id, "a3".to_string(), expires_at),
            later,
        )
        .await
        .unwrap());

    assert!(refresh_tokens
        .find_by_user_and_hash(&ann.id, "stale")
        .await
        .unwrap()
        .is_none());
    assert_eq!(refresh_tokens.delete_all_for_user(&ann.id).await.unwrap(), 1);
}
