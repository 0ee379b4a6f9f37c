use common::{UserRole, UserStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub email_verified_at: Option<DateTimeUtc>,
    pub role: UserRole,
    pub date_of_birth: Date,
    pub school_reg_no: Option<String>,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub remember_token: Option<String>,
    pub current_team_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(2048))", nullable)]
    pub profile_photo: Option<String>, // path on the file store
    pub status: UserStatus,

    #[sea_orm(has_many)]
    pub challenges: HasMany<super::challenge::Entity>,

    #[sea_orm(has_many)]
    pub participants: HasMany<super::participant::Entity>,

    #[sea_orm(has_many)]
    pub schools: HasMany<super::school::Entity>,

    #[sea_orm(has_many)]
    pub sessions: HasMany<super::session::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
