#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of university activity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COURSE"))]
    Course,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "WORKSHOP"))]
    Workshop,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SEMINAR"))]
    Seminar,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "RESEARCH"))]
    Research,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "EXTENSION"))]
    Extension,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "OTHER"))]
    #[default]
    Other,
}

impl ActivityType {
    pub const ALL: &'static [ActivityType] = &[
        Self::Course,
        Self::Workshop,
        Self::Seminar,
        Self::Research,
        Self::Extension,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "COURSE",
            Self::Workshop => "WORKSHOP",
            Self::Seminar => "SEMINAR",
            Self::Research => "RESEARCH",
            Self::Extension => "EXTENSION",
            Self::Other => "OTHER",
        }
    }

    /// Display label shown in filter forms.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Course => "Curso",
            Self::Workshop => "Workshop",
            Self::Seminar => "Seminário",
            Self::Research => "Pesquisa",
            Self::Extension => "Extensão",
            Self::Other => "Outro",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid activity type '{invalid}'. Valid values: COURSE, WORKSHOP, SEMINAR, RESEARCH, EXTENSION, OTHER"
)]
pub struct ParseTypeError {
    invalid: String,
}

impl FromStr for ActivityType {
    type Err = ParseTypeError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| ParseTypeError {
                invalid: s.to_string(),
            })
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
