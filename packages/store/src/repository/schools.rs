use sea_orm::*;
use tracing::instrument;

use crate::entity::{participant, school};
use crate::error::StoreError;
use crate::models::school::{NewSchool, validate_new_school};

#[instrument(skip(db, new_school), fields(registration_number = %new_school.registration_number))]
pub async fn create_school<C: ConnectionTrait>(
    db: &C,
    new_school: NewSchool,
) -> Result<school::Model, StoreError> {
    validate_new_school(&new_school)?;

    let now = chrono::Utc::now();
    let model = school::ActiveModel {
        name: Set(new_school.name.trim().to_string()),
        registration_number: Set(new_school.registration_number.trim().to_string()),
        district: Set(new_school.district.map(|d| d.trim().to_string())),
        representative_id: Set(new_school.representative_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::Conflict("Registration number is already in use".into())
        }
        _ => StoreError::from(e),
    })
}

pub async fn find_school<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<school::Model>, StoreError> {
    Ok(school::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_school_by_registration_number<C: ConnectionTrait>(
    db: &C,
    registration_number: &str,
) -> Result<Option<school::Model>, StoreError> {
    Ok(school::Entity::find()
        .filter(school::Column::RegistrationNumber.eq(registration_number.trim()))
        .one(db)
        .await?)
}

/// All schools ordered by name.
pub async fn list_schools<C: ConnectionTrait>(db: &C) -> Result<Vec<school::Model>, StoreError> {
    Ok(school::Entity::find()
        .order_by_asc(school::Column::Name)
        .order_by_asc(school::Column::Id)
        .all(db)
        .await?)
}

pub async fn school_participants<C: ConnectionTrait>(
    db: &C,
    school_id: i32,
) -> Result<Vec<participant::Model>, StoreError> {
    Ok(participant::Entity::find()
        .filter(participant::Column::SchoolId.eq(school_id))
        .order_by_asc(participant::Column::Id)
        .all(db)
        .await?)
}
