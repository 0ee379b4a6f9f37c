use std::collections::HashMap;

use common::AttemptStatus;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{
    attempt, attempted_question, challenge_attempt, challenge_participant, participant, question,
};
use crate::error::StoreError;
use crate::models::attempt::{Submission, validate_submission};
use crate::repository::challenges::get_challenge;
use crate::repository::participants::get_participant_for_update;

/// Start an attempt, consuming one of the participant's allowance.
///
/// The participant must be linked to the challenge, the challenge must be
/// active, and no other attempt of the participant may be in progress.
/// `attempts_left` drops by exactly one; at zero the call fails with
/// `NoAttemptsLeft` and nothing is written.
#[instrument(skip(db))]
pub async fn start_attempt<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    participant_id: i32,
    challenge_id: i32,
) -> Result<attempt::Model, StoreError> {
    let txn = db.begin().await?;

    let participant = get_participant_for_update(&txn, participant_id).await?;

    let linked = challenge_participant::Entity::find()
        .filter(challenge_participant::Column::ParticipantId.eq(participant_id))
        .filter(challenge_participant::Column::ChallengeId.eq(challenge_id))
        .count(&txn)
        .await?
        > 0;
    if !linked {
        return Err(StoreError::Validation(format!(
            "Participant {participant_id} is not linked to challenge {challenge_id}"
        )));
    }

    let challenge = get_challenge(&txn, challenge_id).await?;
    if !challenge.status.accepts_attempts() {
        return Err(StoreError::Validation(format!(
            "Challenge is {}, not accepting attempts",
            challenge.status
        )));
    }

    let in_progress = attempt::Entity::find()
        .filter(attempt::Column::ParticipantId.eq(participant_id))
        .filter(attempt::Column::Status.eq(AttemptStatus::InProgress))
        .count(&txn)
        .await?;
    if in_progress > 0 {
        return Err(StoreError::Conflict(
            "Participant already has an attempt in progress".into(),
        ));
    }

    if participant.attempts_left <= 0 {
        return Err(StoreError::NoAttemptsLeft(participant_id));
    }

    // Compare-and-swap on the value read above; SQLite ignores FOR UPDATE.
    let remaining = participant.attempts_left - 1;
    let now = chrono::Utc::now();
    let result = participant::Entity::update_many()
        .col_expr(participant::Column::AttemptsLeft, Expr::value(remaining))
        .col_expr(participant::Column::UpdatedAt, Expr::value(now))
        .filter(participant::Column::Id.eq(participant_id))
        .filter(participant::Column::AttemptsLeft.eq(participant.attempts_left))
        .exec(&txn)
        .await?;
    if result.rows_affected != 1 {
        return Err(StoreError::Conflict(
            "Participant was modified concurrently".into(),
        ));
    }

    let model = attempt::ActiveModel {
        participant_id: Set(participant_id),
        challenge_id: Set(challenge_id),
        status: Set(AttemptStatus::InProgress),
        attempts_left_after: Set(remaining),
        started_at: Set(now),
        submitted_at: Set(None),
        ..Default::default()
    };
    let attempt = model.insert(&txn).await?;

    txn.commit().await?;
    info!(attempt_id = attempt.id, attempts_left = remaining, "Started attempt");
    Ok(attempt)
}

pub async fn find_attempt<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<attempt::Model>, StoreError> {
    Ok(attempt::Entity::find_by_id(id).one(db).await?)
}

/// Record the graded outcome of an in-progress attempt.
///
/// Stores the challenge attempt and one attempted question per answer, then
/// adds the score and time to the participant's totals and marks it completed.
/// Each answer must refer to a question of the attempt's challenge and may not
/// award more than that question's marks.
#[instrument(skip(db, submission), fields(answers = submission.answers.len()))]
pub async fn submit_attempt<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    attempt_id: i32,
    submission: Submission,
) -> Result<challenge_attempt::Model, StoreError> {
    validate_submission(&submission)?;

    let txn = db.begin().await?;

    let attempt = attempt::Entity::find_by_id(attempt_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::not_found("Attempt"))?;
    if attempt.status != AttemptStatus::InProgress {
        return Err(StoreError::Conflict(
            "Attempt has already been submitted".into(),
        ));
    }

    let participant = get_participant_for_update(&txn, attempt.participant_id).await?;

    let questions: HashMap<i32, question::Model> = question::Entity::find()
        .filter(question::Column::ChallengeId.eq(attempt.challenge_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    for answer in &submission.answers {
        let question = questions.get(&answer.question_id).ok_or_else(|| {
            StoreError::Validation(format!(
                "Question {} does not belong to challenge {}",
                answer.question_id, attempt.challenge_id
            ))
        })?;
        if answer.marks_awarded > question.marks {
            return Err(StoreError::Validation(format!(
                "Question {} awards at most {} marks",
                question.id, question.marks
            )));
        }
    }

    let score = submission
        .score()
        .ok_or_else(|| StoreError::Validation("Total marks out of range".into()))?;
    let total_score = participant
        .total_score
        .checked_add(score)
        .ok_or_else(|| StoreError::Validation("Participant total score out of range".into()))?;
    let time_taken = participant
        .time_taken
        .checked_add(submission.time_taken)
        .ok_or_else(|| StoreError::Validation("Participant time taken out of range".into()))?;
    let now = chrono::Utc::now();

    let outcome = challenge_attempt::ActiveModel {
        attempt_id: Set(attempt.id),
        challenge_id: Set(attempt.challenge_id),
        participant_id: Set(attempt.participant_id),
        score: Set(score),
        time_taken: Set(submission.time_taken),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for answer in submission.answers {
        attempted_question::ActiveModel {
            challenge_attempt_id: Set(outcome.id),
            challenge_id: Set(attempt.challenge_id),
            participant_id: Set(attempt.participant_id),
            question_id: Set(answer.question_id),
            given_answer: Set(answer.given_answer),
            marks_awarded: Set(answer.marks_awarded),
            time_spent_ms: Set(answer.time_spent_ms),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let mut active_attempt: attempt::ActiveModel = attempt.into();
    active_attempt.status = Set(AttemptStatus::Submitted);
    active_attempt.submitted_at = Set(Some(now));
    active_attempt.update(&txn).await?;

    let mut active_participant: participant::ActiveModel = participant.into();
    active_participant.total_score = Set(total_score);
    active_participant.time_taken = Set(time_taken);
    active_participant.completed = Set(true);
    active_participant.updated_at = Set(now);
    active_participant.update(&txn).await?;

    txn.commit().await?;
    info!(challenge_attempt_id = outcome.id, score, "Submitted attempt");
    Ok(outcome)
}

/// The answers recorded for a submitted attempt, in submission order.
pub async fn attempted_questions<C: ConnectionTrait>(
    db: &C,
    outcome: &challenge_attempt::Model,
) -> Result<Vec<attempted_question::Model>, StoreError> {
    Ok(attempted_question::Entity::find()
        .filter(attempted_question::Column::ChallengeAttemptId.eq(outcome.id))
        .order_by_asc(attempted_question::Column::Id)
        .all(db)
        .await?)
}
