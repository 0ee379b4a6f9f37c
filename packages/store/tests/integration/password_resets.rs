use common::{TokenDigest, UserRole};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};

use store::entity::password_reset_token;
use store::error::StoreError;
use store::repository::{password_resets, users};

use crate::common::TestDb;

const TTL: i64 = 3_600;

#[tokio::test]
async fn unknown_email_issues_nothing() {
    let test = TestDb::spawn().await;
    let token = password_resets::issue_reset_token(&test.db, "nobody@example.com")
        .await
        .unwrap();
    assert!(token.is_none());
}

#[tokio::test]
async fn only_the_digest_is_stored() {
    let test = TestDb::spawn().await;
    test.create_user("alice", UserRole::Participant).await;

    let token = password_resets::issue_reset_token(&test.db, "alice@example.com")
        .await
        .unwrap()
        .unwrap();

    let row = password_reset_token::Entity::find_by_id("alice@example.com".to_string())
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(row.token, token);
    assert_eq!(row.token, TokenDigest::compute(&token).to_hex());
}

#[tokio::test]
async fn reissuing_replaces_the_previous_token() {
    let test = TestDb::spawn().await;
    test.create_user("alice", UserRole::Participant).await;

    let first = password_resets::issue_reset_token(&test.db, "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    let second = password_resets::issue_reset_token(&test.db, "alice@example.com")
        .await
        .unwrap()
        .unwrap();

    let rows = password_reset_token::Entity::find().all(&test.db).await.unwrap();
    assert_eq!(rows.len(), 1);

    let err = password_resets::consume_reset_token(
        &test.db,
        "alice@example.com",
        &first,
        "brand-new-password",
        TTL,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::InvalidToken));

    password_resets::consume_reset_token(
        &test.db,
        "alice@example.com",
        &second,
        "brand-new-password",
        TTL,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn consuming_sets_the_new_password_once() {
    let test = TestDb::spawn().await;
    test.create_user("alice", UserRole::Participant).await;
    let token = password_resets::issue_reset_token(&test.db, "alice@example.com")
        .await
        .unwrap()
        .unwrap();

    password_resets::consume_reset_token(
        &test.db,
        "alice@example.com",
        &token,
        "brand-new-password",
        TTL,
    )
    .await
    .unwrap();

    let login = users::verify_credentials(&test.db, "alice", "brand-new-password")
        .await
        .unwrap();
    assert!(login.is_some());

    let err = password_resets::consume_reset_token(
        &test.db,
        "alice@example.com",
        &token,
        "another-password",
        TTL,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::InvalidToken));
}

#[tokio::test]
async fn expired_tokens_are_rejected_and_removed() {
    let test = TestDb::spawn().await;
    test.create_user("alice", UserRole::Participant).await;
    let token = password_resets::issue_reset_token(&test.db, "alice@example.com")
        .await
        .unwrap()
        .unwrap();

    let row = password_reset_token::Entity::find_by_id("alice@example.com".to_string())
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    let mut aged = row.into_active_model();
    aged.created_at = Set(Some(chrono::Utc::now() - chrono::Duration::hours(2)));
    aged.update(&test.db).await.unwrap();

    let err = password_resets::consume_reset_token(
        &test.db,
        "alice@example.com",
        &token,
        "brand-new-password",
        TTL,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::InvalidToken));
    assert!(
        password_reset_token::Entity::find()
            .all(&test.db)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn prune_removes_expired_tokens() {
    let test = TestDb::spawn().await;
    test.create_user("alice", UserRole::Participant).await;
    test.create_user("bob", UserRole::Participant).await;
    password_resets::issue_reset_token(&test.db, "alice@example.com")
        .await
        .unwrap();
    password_resets::issue_reset_token(&test.db, "bob@example.com")
        .await
        .unwrap();

    let row = password_reset_token::Entity::find_by_id("bob@example.com".to_string())
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    let mut aged = row.into_active_model();
    aged.created_at = Set(Some(chrono::Utc::now() - chrono::Duration::hours(2)));
    aged.update(&test.db).await.unwrap();

    assert_eq!(password_resets::prune_reset_tokens(&test.db, TTL).await.unwrap(), 1);
    let left = password_reset_token::Entity::find().all(&test.db).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].email, "alice@example.com");
}
