use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attempted_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub challenge_attempt_id: i32,
    #[sea_orm(belongs_to, from = "challenge_attempt_id", to = "id")]
    pub challenge_attempt: HasOne<super::challenge_attempt::Entity>,

    pub challenge_id: i32,
    #[sea_orm(belongs_to, from = "challenge_id", to = "id")]
    pub challenge: HasOne<super::challenge::Entity>,

    pub participant_id: i32,
    #[sea_orm(belongs_to, from = "participant_id", to = "id")]
    pub participant: HasOne<super::participant::Entity>,

    pub question_id: i32,
    #[sea_orm(belongs_to, from = "question_id", to = "id")]
    pub question: HasOne<super::question::Entity>,

    #[sea_orm(column_type = "Text")]
    pub given_answer: String,
    pub marks_awarded: i32,
    pub time_spent_ms: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
