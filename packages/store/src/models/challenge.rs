use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::shared::validate_required;

/// Input for creating a challenge. `status` starts as draft.
#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Minutes.
    pub duration: i32,
    pub number_of_questions: i32,
    pub administrator_id: i32,
}

pub fn validate_new_challenge(challenge: &NewChallenge) -> Result<(), StoreError> {
    validate_required("Title", &challenge.title, 256)?;
    if challenge.description.chars().count() > 100_000 {
        return Err(StoreError::Validation(
            "Description must be at most 100000 characters".into(),
        ));
    }
    if challenge.start_date > challenge.end_date {
        return Err(StoreError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }
    if challenge.duration <= 0 {
        return Err(StoreError::Validation("Duration must be > 0".into()));
    }
    if challenge.number_of_questions <= 0 {
        return Err(StoreError::Validation(
            "Number of questions must be > 0".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question_text: String,
    pub answer: String,
    pub marks: i32,
}

pub fn validate_new_question(question: &NewQuestion) -> Result<(), StoreError> {
    validate_required("Question text", &question.question_text, 10_000)?;
    validate_required("Answer", &question.answer, 10_000)?;
    if question.marks < 0 {
        return Err(StoreError::Validation("Marks must be >= 0".into()));
    }
    Ok(())
}
