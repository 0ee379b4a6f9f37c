use sea_orm::sea_query::LockType;
use sea_orm::*;
use serde::Serialize;
use tracing::{info, instrument};

use crate::entity::{
    attempt, attempted_question, challenge, challenge_attempt, challenge_participant, participant,
    school, user,
};
use crate::error::StoreError;
use crate::models::participant::{NewParticipant, validate_new_participant};
use crate::repository::challenges::get_challenge;

/// A challenge reached through `challenge_participants`, with the join row's timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinkedChallenge {
    pub challenge: challenge::Model,
    pub linked_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Enrol a user in a challenge on behalf of a school.
///
/// Writes the participant row and its join row for the same challenge in
/// one transaction, so the two linkages start out consistent.
#[instrument(skip(db, new_participant), fields(user_id = new_participant.user_id, challenge_id = new_participant.challenge_id))]
pub async fn enroll_participant<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    new_participant: NewParticipant,
) -> Result<participant::Model, StoreError> {
    validate_new_participant(&new_participant)?;

    let txn = db.begin().await?;

    user::Entity::find_by_id(new_participant.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::not_found("User"))?;
    school::Entity::find_by_id(new_participant.school_id)
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::not_found("School"))?;
    get_challenge(&txn, new_participant.challenge_id).await?;

    let now = chrono::Utc::now();
    let model = participant::ActiveModel {
        user_id: Set(new_participant.user_id),
        school_id: Set(new_participant.school_id),
        challenge_id: Set(new_participant.challenge_id),
        attempts_left: Set(new_participant.attempts_left),
        total_score: Set(0),
        completed: Set(false),
        time_taken: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let participant = model.insert(&txn).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::Conflict("User is already enrolled in this challenge".into())
        }
        _ => StoreError::from(e),
    })?;

    insert_link(&txn, participant.id, participant.challenge_id).await?;

    txn.commit().await?;
    info!(participant_id = participant.id, "Enrolled participant");
    Ok(participant)
}

async fn insert_link<C: ConnectionTrait>(
    db: &C,
    participant_id: i32,
    challenge_id: i32,
) -> Result<challenge_participant::Model, StoreError> {
    let now = chrono::Utc::now();
    let link = challenge_participant::ActiveModel {
        challenge_id: Set(challenge_id),
        participant_id: Set(participant_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    link.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::Conflict("Participant is already linked to this challenge".into())
        }
        _ => StoreError::from(e),
    })
}

pub async fn find_participant<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<participant::Model>, StoreError> {
    Ok(participant::Entity::find_by_id(id).one(db).await?)
}

/// Look up a participant by ID, failing with `NotFound` if absent.
pub async fn get_participant<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<participant::Model, StoreError> {
    find_participant(db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Participant"))
}

pub(crate) async fn get_participant_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<participant::Model, StoreError> {
    participant::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("Participant"))
}

/// Link a participant to a further challenge through the join table.
#[instrument(skip(db))]
pub async fn link_challenge<C: ConnectionTrait>(
    db: &C,
    participant_id: i32,
    challenge_id: i32,
) -> Result<challenge_participant::Model, StoreError> {
    get_participant(db, participant_id).await?;
    get_challenge(db, challenge_id).await?;
    insert_link(db, participant_id, challenge_id).await
}

/// Remove a join-table link. The enrolment challenge cannot be unlinked.
///
/// Returns true if a link was removed.
#[instrument(skip(db))]
pub async fn unlink_challenge<C: ConnectionTrait>(
    db: &C,
    participant_id: i32,
    challenge_id: i32,
) -> Result<bool, StoreError> {
    let participant = get_participant(db, participant_id).await?;
    if participant.challenge_id == challenge_id {
        return Err(StoreError::Conflict(
            "Cannot unlink the participant's enrolment challenge".into(),
        ));
    }

    let result = challenge_participant::Entity::delete_many()
        .filter(challenge_participant::Column::ParticipantId.eq(participant_id))
        .filter(challenge_participant::Column::ChallengeId.eq(challenge_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Whether the participant's direct `challenge_id` also appears in the join table.
pub async fn linkage_is_consistent<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<bool, StoreError> {
    let count = challenge_participant::Entity::find()
        .filter(challenge_participant::Column::ParticipantId.eq(participant.id))
        .filter(challenge_participant::Column::ChallengeId.eq(participant.challenge_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn user<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Option<user::Model>, StoreError> {
    Ok(user::Entity::find_by_id(participant.user_id).one(db).await?)
}

pub async fn school<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Option<school::Model>, StoreError> {
    Ok(school::Entity::find_by_id(participant.school_id).one(db).await?)
}

/// Every challenge the participant is linked to, in link order.
pub async fn challenges<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Vec<LinkedChallenge>, StoreError> {
    let rows = challenge_participant::Entity::find()
        .filter(challenge_participant::Column::ParticipantId.eq(participant.id))
        .find_also_related(challenge::Entity)
        .order_by_asc(challenge_participant::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(link, challenge)| {
            challenge.map(|challenge| LinkedChallenge {
                challenge,
                linked_at: link.created_at,
                updated_at: link.updated_at,
            })
        })
        .collect())
}

pub async fn challenge_participants<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Vec<challenge_participant::Model>, StoreError> {
    Ok(challenge_participant::Entity::find()
        .filter(challenge_participant::Column::ParticipantId.eq(participant.id))
        .order_by_asc(challenge_participant::Column::Id)
        .all(db)
        .await?)
}

pub async fn attempts<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Vec<attempt::Model>, StoreError> {
    Ok(attempt::Entity::find()
        .filter(attempt::Column::ParticipantId.eq(participant.id))
        .order_by_asc(attempt::Column::Id)
        .all(db)
        .await?)
}

pub async fn challenge_attempts<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Vec<challenge_attempt::Model>, StoreError> {
    Ok(challenge_attempt::Entity::find()
        .filter(challenge_attempt::Column::ParticipantId.eq(participant.id))
        .order_by_asc(challenge_attempt::Column::Id)
        .all(db)
        .await?)
}

pub async fn attempted_questions<C: ConnectionTrait>(
    db: &C,
    participant: &participant::Model,
) -> Result<Vec<attempted_question::Model>, StoreError> {
    Ok(attempted_question::Entity::find()
        .filter(attempted_question::Column::ParticipantId.eq(participant.id))
        .order_by_asc(attempted_question::Column::Id)
        .all(db)
        .await?)
}
