use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's enrolment in a challenge on behalf of a school.
///
/// The participant is linked to its enrolment challenge directly through
/// `challenge_id`, and to every challenge it takes part in through the
/// `challenge_participants` join table. The enrolment challenge always has a
/// join row too.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub school_id: i32,
    #[sea_orm(belongs_to, from = "school_id", to = "id")]
    pub school: HasOne<super::school::Entity>,

    pub challenge_id: i32,
    #[sea_orm(belongs_to, from = "challenge_id", to = "id")]
    pub challenge: HasOne<super::challenge::Entity>,

    pub attempts_left: i32,
    pub total_score: i32,
    pub completed: bool,
    pub time_taken: i32, // in seconds, summed over submitted attempts

    #[sea_orm(has_many)]
    pub challenge_participants: HasMany<super::challenge_participant::Entity>,

    #[sea_orm(has_many)]
    pub attempts: HasMany<super::attempt::Entity>,

    #[sea_orm(has_many)]
    pub challenge_attempts: HasMany<super::challenge_attempt::Entity>,

    #[sea_orm(has_many)]
    pub attempted_questions: HasMany<super::attempted_question::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
