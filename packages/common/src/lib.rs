pub mod challenge_status;
pub mod token;
pub mod user_role;

use std::fmt;

pub use challenge_status::{AttemptStatus, ChallengeStatus};
pub use token::{TokenDigest, generate_token};
pub use user_role::{UserRole, UserStatus};

/// Error when parsing an invalid enum string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    invalid: String,
    valid: Vec<&'static str>,
}

impl ParseEnumError {
    pub(crate) fn new(
        kind: &'static str,
        invalid: &str,
        valid: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self {
            kind,
            invalid: invalid.to_string(),
            valid: valid.into_iter().collect(),
        }
    }
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.kind,
            self.invalid,
            self.valid.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}
