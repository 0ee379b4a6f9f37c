use common::AttemptStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One consumed attempt allowance. Created in progress, closed by submission.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub participant_id: i32,
    #[sea_orm(belongs_to, from = "participant_id", to = "id")]
    pub participant: HasOne<super::participant::Entity>,

    pub challenge_id: i32,
    #[sea_orm(belongs_to, from = "challenge_id", to = "id")]
    pub challenge: HasOne<super::challenge::Entity>,

    pub status: AttemptStatus,
    /// `participants.attempts_left` right after this attempt was started.
    pub attempts_left_after: i32,

    #[sea_orm(has_one)]
    pub challenge_attempt: HasOne<super::challenge_attempt::Entity>,

    pub started_at: DateTimeUtc,
    pub submitted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
