use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an activity.
///
/// Older records and clients use `UPCOMING` and `ACTIVE`; those spellings are
/// accepted everywhere a status is parsed and collapse onto `Pending` and
/// `InProgress`. Serialization always emits the canonical spelling.
///
/// Stored as plain text rather than a database enum: rows written by older
/// clients may hold a legacy spelling, and reads go through [`normalize`].
///
/// [`normalize`]: ActivityStatus::normalize
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    /// Scheduled, not started yet. Legacy spelling: `UPCOMING`.
    #[default]
    Pending,
    /// Currently running. Legacy spelling: `ACTIVE`.
    InProgress,
    Completed,
    Cancelled,
}

/// Dashboard bucket a status is counted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

/// Legacy spellings still found in stored rows, with their canonical status.
pub const LEGACY_STATUS_ALIASES: &[(&str, ActivityStatus)] = &[
    ("UPCOMING", ActivityStatus::Pending),
    ("ACTIVE", ActivityStatus::InProgress),
];

impl ActivityStatus {
    /// All canonical status values.
    pub const ALL: &'static [ActivityStatus] = &[
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Display label shown in filter forms.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Próximo",
            Self::InProgress => "Em andamento",
            Self::Completed => "Concluído",
            Self::Cancelled => "Cancelado",
        }
    }

    pub fn bucket(&self) -> StatusBucket {
        match self {
            Self::Pending => StatusBucket::Upcoming,
            Self::InProgress => StatusBucket::Active,
            Self::Completed => StatusBucket::Completed,
            Self::Cancelled => StatusBucket::Cancelled,
        }
    }

    /// Every spelling a row with this status may carry in storage: the
    /// canonical value first, then any legacy aliases.
    pub fn stored_values(&self) -> &'static [&'static str] {
        match self {
            Self::Pending => &["PENDING", "UPCOMING"],
            Self::InProgress => &["IN_PROGRESS", "ACTIVE"],
            Self::Completed => &["COMPLETED"],
            Self::Cancelled => &["CANCELLED"],
        }
    }

    /// Every spelling of every status that storage may hold.
    pub fn known_stored_values() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .iter()
            .flat_map(|status| status.stored_values().iter().copied())
    }

    /// Map any accepted spelling (canonical or legacy, any case, surrounding
    /// whitespace ignored) onto the canonical status.
    pub fn normalize(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match upper.as_str() {
            "PENDING" | "UPCOMING" => Some(Self::Pending),
            "IN_PROGRESS" | "ACTIVE" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl StatusBucket {
    pub const ALL: &'static [StatusBucket] = &[
        Self::Upcoming,
        Self::Active,
        Self::Completed,
        Self::Cancelled,
    ];
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid status '{invalid}'. Valid values: PENDING, IN_PROGRESS, COMPLETED, CANCELLED (or legacy UPCOMING, ACTIVE)"
)]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for ActivityStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or_else(|| ParseStatusError {
            invalid: s.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for ActivityStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
