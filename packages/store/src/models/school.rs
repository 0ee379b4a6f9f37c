use crate::error::StoreError;
use crate::models::shared::validate_required;

#[derive(Debug, Clone)]
pub struct NewSchool {
    pub name: String,
    pub registration_number: String,
    pub district: Option<String>,
    pub representative_id: Option<i32>,
}

pub fn validate_new_school(school: &NewSchool) -> Result<(), StoreError> {
    validate_required("School name", &school.name, 255)?;
    validate_required("Registration number", &school.registration_number, 255)?;
    if let Some(district) = &school.district {
        validate_required("District", district, 255)?;
    }
    Ok(())
}
