use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(unique)]
    pub registration_number: String,
    pub district: Option<String>,

    pub representative_id: Option<i32>,
    #[sea_orm(belongs_to, from = "representative_id", to = "id")]
    pub representative: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub participants: HasMany<super::participant::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
