use common::UserStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{StoreError, map_user_unique};
use crate::models::user::{NewUser, validate_new_user, validate_profile_photo};
use crate::utils::hash;

/// Register a user. The password is hashed with Argon2 before it is stored.
#[instrument(skip(db, new_user), fields(username = %new_user.username))]
pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    new_user: NewUser,
) -> Result<user::Model, StoreError> {
    validate_new_user(&new_user)?;

    let password = hash::hash_password(&new_user.password)
        .map_err(|e| StoreError::Internal(format!("Password hash error: {}", e)))?;

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        username: Set(new_user.username.trim().to_string()),
        firstname: Set(new_user.firstname.trim().to_string()),
        lastname: Set(new_user.lastname.trim().to_string()),
        email: Set(new_user.email.trim().to_lowercase()),
        email_verified_at: Set(None),
        role: Set(new_user.role),
        date_of_birth: Set(new_user.date_of_birth),
        school_reg_no: Set(new_user.school_reg_no.map(|s| s.trim().to_string())),
        password: Set(password),
        remember_token: Set(None),
        current_team_id: Set(None),
        profile_photo: Set(None),
        status: Set(UserStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.map_err(map_user_unique)
}

pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

/// Look up a user by ID, failing with `NotFound` if absent.
pub async fn get_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, StoreError> {
    find_user(db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("User"))
}

pub async fn find_user_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await?)
}

/// Emails are stored lowercased, so the lookup is case-insensitive.
pub async fn find_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

/// Check a username/password pair.
///
/// Returns `None` for an unknown user, a wrong password, or an inactive account.
#[instrument(skip(db, password))]
pub async fn verify_credentials<C: ConnectionTrait>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, StoreError> {
    let Some(user) = find_user_by_username(db, username).await? else {
        return Ok(None);
    };

    let is_valid = hash::verify_password(password, &user.password)
        .map_err(|e| StoreError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid || user.status != UserStatus::Active {
        return Ok(None);
    }
    Ok(Some(user))
}

/// Retire or reactivate an account. Users are never deleted by the store.
#[instrument(skip(db))]
pub async fn set_user_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: UserStatus,
) -> Result<user::Model, StoreError> {
    let mut active: user::ActiveModel = get_user(db, id).await?.into();
    active.status = Set(status);
    active.updated_at = Set(chrono::Utc::now());
    Ok(active.update(db).await?)
}

#[instrument(skip(db))]
pub async fn update_profile_photo<C: ConnectionTrait>(
    db: &C,
    id: i32,
    path: Option<String>,
) -> Result<user::Model, StoreError> {
    validate_profile_photo(path.as_deref())?;

    let mut active: user::ActiveModel = get_user(db, id).await?.into();
    active.profile_photo = Set(path);
    active.updated_at = Set(chrono::Utc::now());
    Ok(active.update(db).await?)
}

/// Stamp `email_verified_at`. A second call keeps the first timestamp.
#[instrument(skip(db))]
pub async fn mark_email_verified<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<user::Model, StoreError> {
    let existing = get_user(db, id).await?;
    if existing.email_verified_at.is_some() {
        return Ok(existing);
    }

    let now = chrono::Utc::now();
    let mut active: user::ActiveModel = existing.into();
    active.email_verified_at = Set(Some(now));
    active.updated_at = Set(now);
    Ok(active.update(db).await?)
}

/// Replace a user's password hash.
pub(crate) async fn set_password<C: ConnectionTrait>(
    db: &C,
    user: user::Model,
    password: &str,
) -> Result<user::Model, StoreError> {
    let hash = hash::hash_password(password)
        .map_err(|e| StoreError::Internal(format!("Password hash error: {}", e)))?;

    let mut active: user::ActiveModel = user.into();
    active.password = Set(hash);
    active.remember_token = Set(None);
    active.updated_at = Set(chrono::Utc::now());
    Ok(active.update(db).await?)
}
