#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseEnumError;

/// Publication state of a challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    /// Being prepared; not open to participants.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "draft"))]
    Draft,
    /// Open for attempts.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "active"))]
    Active,
    /// No further attempts accepted.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "closed"))]
    Closed,
}

impl ChallengeStatus {
    pub const ALL: &'static [ChallengeStatus] = &[Self::Draft, Self::Active, Self::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Returns true if participants may start attempts.
    pub fn accepts_attempts(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ChallengeStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl FromStr for ChallengeStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseEnumError::new(
                "status",
                s,
                Self::ALL.iter().map(|s| s.as_str()),
            )),
        }
    }
}

/// Lifecycle of a single attempt at a challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "in_progress"))]
    InProgress,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "submitted"))]
    Submitted,
}

impl AttemptStatus {
    pub const ALL: &'static [AttemptStatus] = &[Self::InProgress, Self::Submitted];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "submitted" => Ok(Self::Submitted),
            _ => Err(ParseEnumError::new(
                "attempt status",
                s,
                Self::ALL.iter().map(|s| s.as_str()),
            )),
        }
    }
}
