use common::{ChallengeStatus, UserRole};
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{attempted_question, challenge, challenge_attempt, participant, question, user};
use crate::error::StoreError;
use crate::models::challenge::{
    NewChallenge, NewQuestion, validate_new_challenge, validate_new_question,
};

/// Create a draft challenge owned by an administrator.
///
/// Fails with `NotAdministrator` if `administrator_id` names a user whose
/// role is not admin.
#[instrument(skip(db, new_challenge), fields(title = %new_challenge.title))]
pub async fn create_challenge<C: ConnectionTrait>(
    db: &C,
    new_challenge: NewChallenge,
) -> Result<challenge::Model, StoreError> {
    validate_new_challenge(&new_challenge)?;

    let admin = user::Entity::find_by_id(new_challenge.administrator_id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("User"))?;
    if !admin.role.is_admin() {
        return Err(StoreError::NotAdministrator(admin.id));
    }

    let now = chrono::Utc::now();
    let model = challenge::ActiveModel {
        title: Set(new_challenge.title.trim().to_string()),
        description: Set(new_challenge.description),
        start_date: Set(new_challenge.start_date),
        end_date: Set(new_challenge.end_date),
        duration: Set(new_challenge.duration),
        number_of_questions: Set(new_challenge.number_of_questions),
        status: Set(ChallengeStatus::Draft),
        administrator_id: Set(admin.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

pub async fn find_challenge<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<challenge::Model>, StoreError> {
    Ok(challenge::Entity::find_by_id(id).one(db).await?)
}

/// Look up a challenge by ID, failing with `NotFound` if absent.
pub async fn get_challenge<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<challenge::Model, StoreError> {
    find_challenge(db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Challenge"))
}

pub(crate) async fn get_challenge_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<challenge::Model, StoreError> {
    challenge::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("Challenge"))
}

/// List challenges, optionally restricted to one status, earliest start first.
pub async fn list_challenges<C: ConnectionTrait>(
    db: &C,
    status: Option<ChallengeStatus>,
) -> Result<Vec<challenge::Model>, StoreError> {
    let mut select = challenge::Entity::find();
    if let Some(status) = status {
        select = select.filter(challenge::Column::Status.eq(status));
    }
    Ok(select
        .order_by_asc(challenge::Column::StartDate)
        .order_by_asc(challenge::Column::Id)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn set_challenge_status<C: ConnectionTrait>(
    db: &C,
    id: i32,
    status: ChallengeStatus,
) -> Result<challenge::Model, StoreError> {
    let mut active: challenge::ActiveModel = get_challenge(db, id).await?.into();
    active.status = Set(status);
    active.updated_at = Set(chrono::Utc::now());
    Ok(active.update(db).await?)
}

#[instrument(skip(db, new_question))]
pub async fn add_question<C: ConnectionTrait>(
    db: &C,
    challenge_id: i32,
    new_question: NewQuestion,
) -> Result<question::Model, StoreError> {
    validate_new_question(&new_question)?;
    get_challenge(db, challenge_id).await?;

    let now = chrono::Utc::now();
    let model = question::ActiveModel {
        challenge_id: Set(challenge_id),
        question_text: Set(new_question.question_text),
        answer: Set(new_question.answer),
        marks: Set(new_question.marks),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Whether `number_of_questions` equals the number of stored questions.
pub async fn question_count_matches<C: ConnectionTrait>(
    db: &C,
    challenge_id: i32,
) -> Result<bool, StoreError> {
    let challenge = get_challenge(db, challenge_id).await?;
    let count = question::Entity::find()
        .filter(question::Column::ChallengeId.eq(challenge_id))
        .count(db)
        .await?;
    Ok(count == challenge.number_of_questions as u64)
}

/// Delete a challenge with its questions, enrolments and attempt history.
#[instrument(skip(db))]
pub async fn delete_challenge<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    id: i32,
) -> Result<(), StoreError> {
    let txn = db.begin().await?;
    get_challenge_for_update(&txn, id).await?;

    challenge::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    info!(challenge_id = id, "Deleted challenge");
    Ok(())
}

/// The challenge's administrator.
///
/// Resolves to `None` if the referenced user is missing or no longer has
/// the admin role.
pub async fn administrator<C: ConnectionTrait>(
    db: &C,
    challenge: &challenge::Model,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find_by_id(challenge.administrator_id)
        .filter(user::Column::Role.eq(UserRole::Admin))
        .one(db)
        .await?)
}

pub async fn questions<C: ConnectionTrait>(
    db: &C,
    challenge: &challenge::Model,
) -> Result<Vec<question::Model>, StoreError> {
    Ok(question::Entity::find()
        .filter(question::Column::ChallengeId.eq(challenge.id))
        .order_by_asc(question::Column::Id)
        .all(db)
        .await?)
}

/// Participants whose enrolment challenge is this one.
pub async fn participants<C: ConnectionTrait>(
    db: &C,
    challenge: &challenge::Model,
) -> Result<Vec<participant::Model>, StoreError> {
    Ok(participant::Entity::find()
        .filter(participant::Column::ChallengeId.eq(challenge.id))
        .order_by_asc(participant::Column::Id)
        .all(db)
        .await?)
}

pub async fn attempted_questions<C: ConnectionTrait>(
    db: &C,
    challenge: &challenge::Model,
) -> Result<Vec<attempted_question::Model>, StoreError> {
    Ok(attempted_question::Entity::find()
        .filter(attempted_question::Column::ChallengeId.eq(challenge.id))
        .order_by_asc(attempted_question::Column::Id)
        .all(db)
        .await?)
}

pub async fn challenge_attempts<C: ConnectionTrait>(
    db: &C,
    challenge: &challenge::Model,
) -> Result<Vec<challenge_attempt::Model>, StoreError> {
    Ok(challenge_attempt::Entity::find()
        .filter(challenge_attempt::Column::ChallengeId.eq(challenge.id))
        .order_by_asc(challenge_attempt::Column::Id)
        .all(db)
        .await?)
}
