use common::generate_token;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::session;
use crate::error::StoreError;
use crate::models::session::{NewSession, validate_new_session};

/// Open a session with a freshly generated id.
#[instrument(skip(db, new_session), fields(user_id = ?new_session.user_id))]
pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    new_session: NewSession,
) -> Result<session::Model, StoreError> {
    validate_new_session(&new_session)?;

    let model = session::ActiveModel {
        id: Set(generate_token()),
        user_id: Set(new_session.user_id),
        ip_address: Set(new_session.ip_address),
        user_agent: Set(new_session.user_agent),
        payload: Set(new_session.payload),
        last_activity: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

pub async fn find_session<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> Result<Option<session::Model>, StoreError> {
    Ok(session::Entity::find_by_id(id.to_owned()).one(db).await?)
}

/// Bump `last_activity`, optionally replacing the payload.
#[instrument(skip(db, payload))]
pub async fn touch_session<C: ConnectionTrait>(
    db: &C,
    id: &str,
    payload: Option<String>,
) -> Result<session::Model, StoreError> {
    let existing = find_session(db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Session"))?;

    let mut active: session::ActiveModel = existing.into();
    active.last_activity = Set(chrono::Utc::now().timestamp());
    if let Some(payload) = payload {
        active.payload = Set(payload);
    }
    Ok(active.update(db).await?)
}

/// Returns true if a session was deleted.
pub async fn delete_session<C: ConnectionTrait>(db: &C, id: &str) -> Result<bool, StoreError> {
    let result = session::Entity::delete_by_id(id.to_owned()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Log a user out everywhere.
#[instrument(skip(db))]
pub async fn delete_user_sessions<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<u64, StoreError> {
    let result = session::Entity::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// A user's sessions, most recently active first.
pub async fn user_sessions<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<session::Model>, StoreError> {
    Ok(session::Entity::find()
        .filter(session::Column::UserId.eq(user_id))
        .order_by_desc(session::Column::LastActivity)
        .all(db)
        .await?)
}

/// Delete sessions idle for longer than `lifetime_secs`.
#[instrument(skip(db))]
pub async fn prune_sessions<C: ConnectionTrait>(
    db: &C,
    lifetime_secs: i64,
) -> Result<u64, StoreError> {
    let cutoff = chrono::Utc::now().timestamp() - lifetime_secs;
    let result = session::Entity::delete_many()
        .filter(session::Column::LastActivity.lt(cutoff))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        info!(count = result.rows_affected, "Pruned idle sessions");
    }
    Ok(result.rows_affected)
}
