use sea_orm::{DbErr, SqlErr};

/// Error type returned by every store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("{0}")]
    Conflict(String),
    /// A referenced row does not exist, or a referencing row blocks a delete.
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),
    #[error("User {0} is not an administrator")]
    NotAdministrator(i32),
    #[error("Participant {0} has no attempts left")]
    NoAttemptsLeft(i32),
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(DbErr),
}

impl StoreError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "VALIDATION_ERROR",
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::UsernameTaken => "USERNAME_TAKEN",
            StoreError::EmailTaken => "EMAIL_TAKEN",
            StoreError::Conflict(_) => "CONFLICT",
            StoreError::ForeignKey(_) => "FOREIGN_KEY_VIOLATION",
            StoreError::NotAdministrator(_) => "NOT_ADMINISTRATOR",
            StoreError::NoAttemptsLeft(_) => "NO_ATTEMPTS_LEFT",
            StoreError::InvalidToken => "TOKEN_INVALID",
            StoreError::Internal(_) => "INTERNAL_ERROR",
            StoreError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound(what.into())
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::ForeignKey(detail),
            // SQLite reports RESTRICT deletes with extended code 1811,
            // which `sql_err` does not classify.
            _ if is_foreign_key_failure(&err) => StoreError::ForeignKey(err.to_string()),
            _ => StoreError::Database(err),
        }
    }
}

fn is_foreign_key_failure(err: &DbErr) -> bool {
    matches!(err, DbErr::Exec(_) | DbErr::Query(_))
        && err.to_string().contains("FOREIGN KEY constraint failed")
}

/// Map a unique violation on `users` to the column that caused it.
///
/// Backends name the offending constraint or column differently, so the
/// detail string is matched loosely.
pub(crate) fn map_user_unique(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            if detail.contains("email") {
                StoreError::EmailTaken
            } else if detail.contains("username") {
                StoreError::UsernameTaken
            } else {
                StoreError::Conflict(detail)
            }
        }
        _ => StoreError::from(err),
    }
}
