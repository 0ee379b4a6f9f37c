use std::collections::HashSet;

use crate::error::StoreError;

/// One answered question inside a submission.
#[derive(Debug, Clone)]
pub struct AnsweredQuestion {
    pub question_id: i32,
    pub given_answer: String,
    /// Marks granted by the caller's grader; capped by the question's marks.
    pub marks_awarded: i32,
    pub time_spent_ms: i64,
}

/// The graded outcome of an in-progress attempt.
#[derive(Debug, Clone)]
pub struct Submission {
    pub answers: Vec<AnsweredQuestion>,
    /// Seconds.
    pub time_taken: i32,
}

impl Submission {
    /// Sum of the awarded marks, `None` if it does not fit in an `i32`.
    pub fn score(&self) -> Option<i32> {
        self.answers
            .iter()
            .try_fold(0i32, |total, a| total.checked_add(a.marks_awarded))
    }
}

pub fn validate_submission(submission: &Submission) -> Result<(), StoreError> {
    if submission.time_taken < 0 {
        return Err(StoreError::Validation("time_taken must be >= 0".into()));
    }
    let mut seen = HashSet::new();
    for answer in &submission.answers {
        if !seen.insert(answer.question_id) {
            return Err(StoreError::Validation(format!(
                "Duplicate answer for question {}",
                answer.question_id
            )));
        }
        if answer.marks_awarded < 0 {
            return Err(StoreError::Validation("marks_awarded must be >= 0".into()));
        }
        if answer.time_spent_ms < 0 {
            return Err(StoreError::Validation("time_spent_ms must be >= 0".into()));
        }
    }
    if submission.score().is_none() {
        return Err(StoreError::Validation("Total marks out of range".into()));
    }
    Ok(())
}
