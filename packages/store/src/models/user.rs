use chrono::NaiveDate;
use common::UserRole;

use crate::error::StoreError;
use crate::models::shared::{validate_email, validate_password, validate_required};

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// 1-32 chars, letters, digits and underscores.
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Plaintext; hashed before it is stored.
    pub password: String,
    pub role: UserRole,
    pub date_of_birth: NaiveDate,
    pub school_reg_no: Option<String>,
}

pub fn validate_new_user(user: &NewUser) -> Result<(), StoreError> {
    let username = user.username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(StoreError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StoreError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    validate_required("First name", &user.firstname, 255)?;
    validate_required("Last name", &user.lastname, 255)?;
    validate_email(&user.email)?;
    validate_password(&user.password)?;
    if let Some(reg_no) = &user.school_reg_no {
        validate_required("School registration number", reg_no, 255)?;
    }
    Ok(())
}

/// Validate a profile photo path (at most 2048 characters).
pub fn validate_profile_photo(path: Option<&str>) -> Result<(), StoreError> {
    if let Some(path) = path
        && (path.trim().is_empty() || path.chars().count() > 2048)
    {
        return Err(StoreError::Validation(
            "Profile photo path must be 1-2048 characters".into(),
        ));
    }
    Ok(())
}
