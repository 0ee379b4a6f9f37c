use common::{TokenDigest, generate_token};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{password_reset_token, user};
use crate::error::StoreError;
use crate::models::shared::validate_password;
use crate::repository::users::{find_user_by_email, set_password};

/// Issue a reset token for `email`, replacing any earlier one.
///
/// Returns the plaintext token for delivery to the user, or `None` when no
/// account has this email. Only the SHA-256 digest is stored.
#[instrument(skip(db))]
pub async fn issue_reset_token<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<String>, StoreError> {
    let Some(user) = find_user_by_email(db, email).await? else {
        return Ok(None);
    };

    let token = generate_token();
    let model = password_reset_token::ActiveModel {
        email: Set(user.email),
        token: Set(TokenDigest::compute(&token).to_hex()),
        created_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };

    password_reset_token::Entity::insert(model)
        .on_conflict(
            OnConflict::column(password_reset_token::Column::Email)
                .update_columns([
                    password_reset_token::Column::Token,
                    password_reset_token::Column::CreatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(Some(token))
}

/// Redeem a reset token and set a new password.
///
/// The token row is deleted on success. Wrong, expired, or unknown tokens
/// fail with `InvalidToken`; an expired row is deleted as well.
#[instrument(skip(db, token, new_password))]
pub async fn consume_reset_token<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    email: &str,
    token: &str,
    new_password: &str,
    ttl_secs: i64,
) -> Result<user::Model, StoreError> {
    validate_password(new_password)?;

    let email = email.trim().to_lowercase();
    let txn = db.begin().await?;

    let row = password_reset_token::Entity::find_by_id(email.clone())
        .one(&txn)
        .await?
        .ok_or(StoreError::InvalidToken)?;

    let digest = TokenDigest::from_hex(&row.token)
        .map_err(|e| StoreError::Internal(e.to_string()))?;
    if !digest.matches(token) {
        return Err(StoreError::InvalidToken);
    }

    let cutoff = chrono::Utc::now() - chrono::Duration::seconds(ttl_secs);
    let expired = row.created_at.is_none_or(|created| created < cutoff);

    password_reset_token::Entity::delete_by_id(email.clone())
        .exec(&txn)
        .await?;

    if expired {
        txn.commit().await?;
        return Err(StoreError::InvalidToken);
    }

    let user = find_user_by_email(&txn, &email)
        .await?
        .ok_or(StoreError::InvalidToken)?;
    let user = set_password(&txn, user, new_password).await?;

    txn.commit().await?;
    Ok(user)
}

/// Delete reset tokens older than `ttl_secs`, and those with no timestamp.
#[instrument(skip(db))]
pub async fn prune_reset_tokens<C: ConnectionTrait>(
    db: &C,
    ttl_secs: i64,
) -> Result<u64, StoreError> {
    let cutoff = chrono::Utc::now() - chrono::Duration::seconds(ttl_secs);
    let result = password_reset_token::Entity::delete_many()
        .filter(
            Condition::any()
                .add(password_reset_token::Column::CreatedAt.lt(cutoff))
                .add(password_reset_token::Column::CreatedAt.is_null()),
        )
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        info!(count = result.rows_affected, "Pruned expired reset tokens");
    }
    Ok(result.rows_affected)
}
