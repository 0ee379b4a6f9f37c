use common::ChallengeStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub duration: i32, // in minutes
    pub number_of_questions: i32,
    pub status: ChallengeStatus,

    /// Must reference a user with role `admin`.
    pub administrator_id: i32,
    #[sea_orm(belongs_to, from = "administrator_id", to = "id")]
    pub administrator: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub questions: HasMany<super::question::Entity>,

    #[sea_orm(has_many)]
    pub participants: HasMany<super::participant::Entity>,

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
