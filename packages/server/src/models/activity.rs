use chrono::{DateTime, NaiveDate, Utc};
use common::{ActivityStatus, ActivityType, StatusBucket};
use serde::{Deserialize, Serialize};

use crate::entity::activity;
use crate::error::AppError;

use super::accessibility::Accessibility;
pub use super::shared::Pagination;
use super::shared::{clean_optional, clean_required};

/// Fixed page size of the activity listing.
pub const PAGE_SIZE: u64 = 12;

/// Number of activities shown in the dashboard's "recent" panel.
pub const RECENT_LIMIT: u64 = 5;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX_BYTES: usize = 1_000_000;
pub const TIME_MAX: usize = 50;
pub const LOCATION_MAX: usize = 200;
pub const COORDINATOR_MAX: usize = 100;
pub const IMAGE_URL_MAX: usize = 500;
pub const TAG_NAME_MAX: usize = 50;
pub const REQUIREMENT_MAX: usize = 200;

/// Create/update form for an activity.
///
/// `tags` is comma-separated free text, `requirements` one requirement per
/// line. Both replace the activity's current set on every save.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ActivityFormRequest {
    #[schema(example = "Curso de Desenvolvimento Web com Django")]
    pub title: String,
    #[schema(example = "Aprenda a desenvolver aplicações web modernas.")]
    pub description: String,
    /// Defaults to `OTHER`.
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    /// Defaults to `PENDING`. Legacy `UPCOMING` / `ACTIVE` are accepted.
    #[serde(default)]
    pub status: ActivityStatus,
    #[schema(example = "2025-03-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2025-05-30")]
    pub end_date: NaiveDate,
    #[serde(default)]
    #[schema(example = "19:00 - 22:00")]
    pub time: Option<String>,
    #[schema(example = "Laboratório de Informática 1")]
    pub location: String,
    #[schema(example = "Prof. Carlos Silva")]
    pub coordinator: String,
    #[schema(example = 25)]
    pub participants: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[schema(example = "programação, web, python")]
    pub tags: String,
    #[serde(default)]
    #[schema(example = "Conhecimentos básicos de Python\nNotebook próprio")]
    pub requirements: String,
}

/// A validated form, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time: Option<String>,
    pub location: String,
    pub coordinator: String,
    pub participants: i32,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub requirements: Vec<String>,
}

/// Split comma-separated tag input: trim, drop empties, keep the first
/// occurrence of each name.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Split newline-separated requirement input: trim, drop empty lines.
pub fn parse_requirements(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate every field of the form. Nothing is written unless this succeeds.
pub fn validate_activity_form(req: &ActivityFormRequest) -> Result<ActivityDraft, AppError> {
    let title = clean_required(&req.title, "Title", TITLE_MIN, TITLE_MAX)?;
    let description = req.description.trim();
    if description.chars().count() < DESCRIPTION_MIN {
        return Err(AppError::Validation(format!(
            "Description must be at least {DESCRIPTION_MIN} characters"
        )));
    }
    if description.len() > DESCRIPTION_MAX_BYTES {
        return Err(AppError::Validation(
            "Description must be at most 1MB".into(),
        ));
    }
    let location = clean_required(&req.location, "Location", 1, LOCATION_MAX)?;
    let coordinator = clean_required(&req.coordinator, "Coordinator", 1, COORDINATOR_MAX)?;
    let time = clean_optional(req.time.as_deref(), "Time", TIME_MAX)?;
    let image_url = clean_optional(req.image_url.as_deref(), "Image URL", IMAGE_URL_MAX)?;

    if req.participants < 1 {
        return Err(AppError::Validation(
            "Participants must be at least 1".into(),
        ));
    }
    if req.end_date < req.start_date {
        return Err(AppError::Validation(
            "End date must not be before start date".into(),
        ));
    }

    let tags = parse_tags(&req.tags);
    if tags.is_empty() {
        return Err(AppError::Validation("Add at least one tag".into()));
    }
    if let Some(long) = tags.iter().find(|t| t.chars().count() > TAG_NAME_MAX) {
        return Err(AppError::Validation(format!(
            "Tag '{long}' must be at most {TAG_NAME_MAX} characters"
        )));
    }

    let requirements = parse_requirements(&req.requirements);
    if requirements
        .iter()
        .any(|r| r.chars().count() > REQUIREMENT_MAX)
    {
        return Err(AppError::Validation(format!(
            "Each requirement must be at most {REQUIREMENT_MAX} characters"
        )));
    }

    Ok(ActivityDraft {
        title,
        description: description.to_string(),
        activity_type: req.activity_type,
        status: req.status,
        start_date: req.start_date,
        end_date: req.end_date,
        time,
        location,
        coordinator,
        participants: req.participants,
        image_url,
        tags,
        requirements,
    })
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TagResponse {
    #[schema(example = 3)]
    pub id: i32,
    #[schema(example = "python")]
    pub name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RequirementResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Notebook próprio")]
    pub requirement: String,
}

/// Full activity, including its tags (sorted by name) and requirements
/// (in input order).
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub status_bucket: StatusBucket,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time: Option<String>,
    pub location: String,
    pub coordinator: String,
    pub participants: i32,
    pub image_url: Option<String>,
    pub tags: Vec<TagResponse>,
    pub requirements: Vec<RequirementResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActivityResponse {
    pub fn new(
        m: activity::Model,
        tags: Vec<TagResponse>,
        requirements: Vec<RequirementResponse>,
    ) -> Self {
        let status = m.canonical_status();
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            activity_type: m.activity_type,
            status,
            status_bucket: status.bucket(),
            start_date: m.start_date,
            end_date: m.end_date,
            time: m.time,
            location: m.location,
            coordinator: m.coordinator,
            participants: m.participants,
            image_url: m.image_url,
            tags,
            requirements,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Activity card used by listings; tags are names only.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityListItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time: Option<String>,
    pub location: String,
    pub coordinator: String,
    pub participants: i32,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ActivityListItem {
    pub fn new(m: activity::Model, tags: Vec<String>) -> Self {
        let status = m.canonical_status();
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            activity_type: m.activity_type,
            status,
            start_date: m.start_date,
            end_date: m.end_date,
            time: m.time,
            location: m.location,
            coordinator: m.coordinator,
            participants: m.participants,
            image_url: m.image_url,
            tags,
            created_at: m.created_at,
        }
    }
}

/// Raw listing/search query string. Every field is free text so that an
/// unrecognised value degrades to "no filter" instead of rejecting the request.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityListQuery {
    /// Case-insensitive substring of title, description, coordinator or location.
    #[param(example = "python")]
    pub search: Option<String>,
    /// Activity type (case-insensitive).
    #[serde(rename = "type")]
    #[param(example = "COURSE")]
    pub activity_type: Option<String>,
    /// Status; legacy `UPCOMING` / `ACTIVE` are accepted.
    #[param(example = "UPCOMING")]
    pub status: Option<String>,
    /// Keep activities starting on or after this date (YYYY-MM-DD).
    #[param(example = "2025-01-01")]
    pub start_date: Option<String>,
    /// Keep activities starting on or before this date (YYYY-MM-DD).
    #[param(example = "2025-12-31")]
    pub end_date: Option<String>,
    /// Page number (1-based). Listing only.
    #[param(example = 1)]
    pub page: Option<String>,
}

/// Filters actually applied to a listing, after normalization.
#[derive(Debug, Default, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ActivityFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub status: Option<ActivityStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ActivityFilter {
    pub fn from_query(query: &ActivityListQuery) -> Self {
        Self {
            search: query
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            activity_type: query
                .activity_type
                .as_deref()
                .and_then(|t| t.parse().ok()),
            status: query.status.as_deref().and_then(ActivityStatus::normalize),
            start_date: query.start_date.as_deref().and_then(parse_date),
            end_date: query.end_date.as_deref().and_then(parse_date),
        }
    }

    /// The search page has no date range.
    pub fn without_dates(self) -> Self {
        Self {
            start_date: None,
            end_date: None,
            ..self
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Requested page, clamped to 1 for missing or unparseable input.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<u64>().ok())
        .unwrap_or(1)
        .max(1)
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct Choice {
    #[schema(example = "COURSE")]
    pub value: &'static str,
    #[schema(example = "Curso")]
    pub label: &'static str,
}

/// Options for the type and status selects of the filter form.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FilterChoices {
    pub types: Vec<Choice>,
    pub statuses: Vec<Choice>,
}

impl FilterChoices {
    pub fn all() -> Self {
        Self {
            types: ActivityType::ALL
                .iter()
                .map(|t| Choice {
                    value: t.as_str(),
                    label: t.label(),
                })
                .collect(),
            statuses: ActivityStatus::ALL
                .iter()
                .map(|s| Choice {
                    value: s.as_str(),
                    label: s.label(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityListPage {
    pub data: Vec<ActivityListItem>,
    pub pagination: Pagination,
    pub filters: ActivityFilter,
    pub choices: FilterChoices,
    pub accessibility: Accessibility,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SearchPage {
    pub data: Vec<ActivityListItem>,
    /// Number of matching activities.
    pub total: u64,
    pub filters: ActivityFilter,
    pub choices: FilterChoices,
    pub accessibility: Accessibility,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityDetailPage {
    pub activity: ActivityResponse,
    pub accessibility: Accessibility,
}

/// Current values of an activity in form-input shape: `tags` joined with
/// `", "`, `requirements` joined with newlines.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityFormValues {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub status: ActivityStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time: Option<String>,
    pub location: String,
    pub coordinator: String,
    pub participants: i32,
    pub image_url: Option<String>,
    pub tags: String,
    pub requirements: String,
}

impl ActivityFormValues {
    pub fn new(m: activity::Model, tags: &[String], requirements: &[String]) -> Self {
        let status = m.canonical_status();
        Self {
            title: m.title,
            description: m.description,
            activity_type: m.activity_type,
            status,
            start_date: m.start_date,
            end_date: m.end_date,
            time: m.time,
            location: m.location,
            coordinator: m.coordinator,
            participants: m.participants,
            image_url: m.image_url,
            tags: tags.join(", "),
            requirements: requirements.join("\n"),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ActivityFormPage {
    pub id: i32,
    pub form: ActivityFormValues,
    pub choices: FilterChoices,
    pub accessibility: Accessibility,
}
