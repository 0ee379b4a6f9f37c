#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseEnumError;

/// Role of a user account. Assigned at registration and not changed afterwards.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Owns and manages challenges.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "admin"))]
    Admin,
    /// Acts on behalf of a school.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "representative"))]
    Representative,
    /// Attempts challenges.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "participant"))]
    Participant,
}

impl UserRole {
    pub const ALL: &'static [UserRole] = &[Self::Admin, Self::Representative, Self::Participant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Representative => "representative",
            Self::Participant => "participant",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Participant
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "representative" => Ok(Self::Representative),
            "participant" => Ok(Self::Participant),
            _ => Err(ParseEnumError::new(
                "role",
                s,
                Self::ALL.iter().map(|r| r.as_str()),
            )),
        }
    }
}

/// Account status. Users are retired by switching to `Inactive`, never deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "active"))]
    Active,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "inactive"))]
    Inactive,
}

impl UserStatus {
    pub const ALL: &'static [UserStatus] = &[Self::Active, Self::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl FromStr for UserStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseEnumError::new(
                "status",
                s,
                Self::ALL.iter().map(|r| r.as_str()),
            )),
        }
    }
}
