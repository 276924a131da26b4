use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::activity;
use crate::error::{AppError, ErrorBody};
use crate::extractors::form::FormInput;
use crate::extractors::path::AppPath;
use crate::models::accessibility::Accessibility;
use crate::models::activity::*;
use crate::state::AppState;
use crate::utils::activity::{
    apply_filter, delete_activity as delete_activity_rows, find_activity, list_items,
    load_requirements, load_tags, newest_first, save_activity,
};

#[utoipa::path(
    get,
    path = "/atividades/",
    tag = "Activities",
    operation_id = "listActivities",
    summary = "List activities with filters and pagination",
    description = "Returns activities ordered newest first, 12 per page. `search` matches title, description, coordinator or location case-insensitively. `status` accepts legacy spellings (`UPCOMING`, `ACTIVE`) and matches rows stored under either spelling. Unknown or malformed filter values are ignored.",
    params(ActivityListQuery),
    responses(
        (status = 200, description = "Page of activities", body = ActivityListPage),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, prefs, query))]
pub async fn list_activities(
    State(state): State<AppState>,
    prefs: Accessibility,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<ActivityListPage>, AppError> {
    let filter = ActivityFilter::from_query(&query);
    let page = parse_page(query.page.as_deref());

    let select = apply_filter(activity::Entity::find(), &filter);
    let total = select.clone().count(&state.db).await?;
    let total_pages = total.div_ceil(PAGE_SIZE);

    // Pages past the end are empty; skipping the query keeps the offset in range.
    let data = if page > total_pages {
        Vec::new()
    } else {
        let models = newest_first(select)
            .offset(Some((page - 1) * PAGE_SIZE))
            .limit(Some(PAGE_SIZE))
            .all(&state.db)
            .await?;
        list_items(&state.db, models).await?
    };

    Ok(Json(ActivityListPage {
        data,
        pagination: Pagination {
            page,
            per_page: PAGE_SIZE,
            total,
            total_pages,
        },
        filters: filter,
        choices: FilterChoices::all(),
        accessibility: prefs,
    }))
}

#[utoipa::path(
    get,
    path = "/search/",
    tag = "Activities",
    operation_id = "searchActivities",
    summary = "Search activities",
    description = "Same text, type and status filters as the listing, without date bounds or pagination. Every match is returned, newest first.",
    params(ActivityListQuery),
    responses(
        (status = 200, description = "Matching activities", body = SearchPage),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, prefs, query))]
pub async fn search_activities(
    State(state): State<AppState>,
    prefs: Accessibility,
    Query(query): Query<ActivityListQuery>,
) -> Result<Json<SearchPage>, AppError> {
    let filter = ActivityFilter::from_query(&query).without_dates();

    let models = newest_first(apply_filter(activity::Entity::find(), &filter))
        .all(&state.db)
        .await?;
    let data = list_items(&state.db, models).await?;

    Ok(Json(SearchPage {
        total: data.len() as u64,
        data,
        filters: filter,
        choices: FilterChoices::all(),
        accessibility: prefs,
    }))
}

#[utoipa::path(
    get,
    path = "/atividades/{id}/",
    tag = "Activities",
    operation_id = "getActivity",
    summary = "Get an activity by ID",
    description = "Returns the activity with its tags (sorted by name) and requirements (in entry order).",
    params(("id" = i32, Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Activity details", body = ActivityDetailPage),
        (status = 404, description = "Activity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, prefs), fields(id))]
pub async fn get_activity(
    State(state): State<AppState>,
    prefs: Accessibility,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ActivityDetailPage>, AppError> {
    let activity = activity_response(&state.db, find_activity(&state.db, id).await?).await?;
    Ok(Json(ActivityDetailPage {
        activity,
        accessibility: prefs,
    }))
}

#[utoipa::path(
    post,
    path = "/atividades/new/",
    tag = "Activities",
    operation_id = "createActivity",
    summary = "Create a new activity",
    description = "Validates the form and stores the activity, its tags (comma-separated, created on demand) and its requirements (one per line) in a single transaction. Accepts JSON or an urlencoded form post.",
    request_body = ActivityFormRequest,
    responses(
        (status = 201, description = "Activity created", body = ActivityResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_activity(
    State(state): State<AppState>,
    FormInput(payload): FormInput<ActivityFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = validate_activity_form(&payload)?;

    let model = save_activity(&state.db, None, &draft).await?;
    tracing::info!(id = model.id, tags = draft.tags.len(), "Activity created");

    let response = activity_response(&state.db, model).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/atividades/edit/{id}/",
    tag = "Activities",
    operation_id = "getActivityForm",
    summary = "Current values of an activity as form input",
    description = "Returns the activity in the shape the update form expects: tags joined with `, ` and requirements joined with newlines.",
    params(("id" = i32, Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Prefilled form", body = ActivityFormPage),
        (status = 404, description = "Activity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, prefs), fields(id))]
pub async fn edit_activity_form(
    State(state): State<AppState>,
    prefs: Accessibility,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ActivityFormPage>, AppError> {
    let model = find_activity(&state.db, id).await?;
    let tags: Vec<String> = load_tags(&state.db, id)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();
    let requirements: Vec<String> = load_requirements(&state.db, id)
        .await?
        .into_iter()
        .map(|r| r.requirement)
        .collect();

    Ok(Json(ActivityFormPage {
        id,
        form: ActivityFormValues::new(model, &tags, &requirements),
        choices: FilterChoices::all(),
        accessibility: prefs,
    }))
}

#[utoipa::path(
    post,
    path = "/atividades/edit/{id}/",
    tag = "Activities",
    operation_id = "updateActivity",
    summary = "Update an existing activity",
    description = "Full form save: every scalar field is overwritten, the tag set is replaced wholesale and all requirements are deleted and recreated, in one transaction. An empty `requirements` field removes every requirement.",
    params(("id" = i32, Path, description = "Activity ID")),
    request_body = ActivityFormRequest,
    responses(
        (status = 200, description = "Activity updated", body = ActivityResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Activity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_activity(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    FormInput(payload): FormInput<ActivityFormRequest>,
) -> Result<Json<ActivityResponse>, AppError> {
    find_activity(&state.db, id).await?;
    let draft = validate_activity_form(&payload)?;

    let model = save_activity(&state.db, Some(id), &draft).await?;
    tracing::info!(id, "Activity updated");

    Ok(Json(activity_response(&state.db, model).await?))
}

#[utoipa::path(
    post,
    path = "/atividades/delete/{id}/",
    tag = "Activities",
    operation_id = "deleteActivity",
    summary = "Delete an activity",
    description = "Deletes the activity, its requirements and its tag associations. Tags themselves are kept.",
    params(("id" = i32, Path, description = "Activity ID")),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 404, description = "Activity not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_activity(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    delete_activity_rows(&state.db, id).await?;
    tracing::info!(id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn activity_response<C: ConnectionTrait>(
    db: &C,
    model: activity::Model,
) -> Result<ActivityResponse, AppError> {
    let tags = load_tags(db, model.id)
        .await?
        .into_iter()
        .map(|t| TagResponse {
            id: t.id,
            name: t.name,
        })
        .collect();
    let requirements = load_requirements(db, model.id)
        .await?
        .into_iter()
        .map(|r| RequirementResponse {
            id: r.id,
            requirement: r.requirement,
        })
        .collect();
    Ok(ActivityResponse::new(model, tags, requirements))
}
