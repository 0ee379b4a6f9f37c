use crate::error::StoreError;

/// Validate a trimmed, required text field of at most `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), StoreError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(StoreError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

/// Shallow email check: one `@` with a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), StoreError> {
    let email = email.trim();
    let valid = email.chars().count() <= 255
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
    if !valid {
        return Err(StoreError::Validation("Email address is invalid".into()));
    }
    Ok(())
}

/// Validate a password length (8-128 bytes).
pub fn validate_password(password: &str) -> Result<(), StoreError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(StoreError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}
