use crate::error::StoreError;

/// Default allowance for a fresh enrolment.
pub const DEFAULT_ATTEMPTS: i32 = 3;

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub user_id: i32,
    pub school_id: i32,
    /// Enrolment challenge.
    pub challenge_id: i32,
    pub attempts_left: i32,
}

impl NewParticipant {
    pub fn new(user_id: i32, school_id: i32, challenge_id: i32) -> Self {
        Self {
            user_id,
            school_id,
            challenge_id,
            attempts_left: DEFAULT_ATTEMPTS,
        }
    }
}

pub fn validate_new_participant(participant: &NewParticipant) -> Result<(), StoreError> {
    if participant.attempts_left < 0 {
        return Err(StoreError::Validation("attempts_left must be >= 0".into()));
    }
    Ok(())
}
