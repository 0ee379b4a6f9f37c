use common::UserRole;
use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::config::AdminSeed;
use crate::error::StoreError;
use crate::models::user::NewUser;
use crate::repository::users;

/// Create the configured administrator account if it does not exist yet.
///
/// Returns true if a user was inserted. An existing account with the same
/// username or email is left untouched.
pub async fn seed_administrator<C: ConnectionTrait>(
    db: &C,
    seed: &AdminSeed,
) -> Result<bool, StoreError> {
    let existing = match users::find_user_by_username(db, &seed.username).await? {
        Some(user) => Some(user),
        None => users::find_user_by_email(db, &seed.email).await?,
    };

    if let Some(user) = existing {
        if !user.role.is_admin() {
            warn!(
                username = %user.username,
                role = %user.role,
                "Seed administrator collides with a non-admin account"
            );
        }
        return Ok(false);
    }

    let new_user = NewUser {
        username: seed.username.clone(),
        firstname: seed.firstname.clone(),
        lastname: seed.lastname.clone(),
        email: seed.email.clone(),
        password: seed.password.clone(),
        role: UserRole::Admin,
        date_of_birth: seed.date_of_birth,
        school_reg_no: None,
    };

    let user = match users::create_user(db, new_user).await {
        Ok(user) => user,
        Err(StoreError::UsernameTaken | StoreError::EmailTaken) => return Ok(false),
        Err(e) => return Err(e),
    };
    users::mark_email_verified(db, user.id).await?;

    info!(username = %user.username, "Seeded administrator account");
    Ok(true)
}
