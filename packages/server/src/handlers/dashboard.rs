use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use common::{ActivityStatus, ActivityType};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use tracing::instrument;

use crate::entity::activity;
use crate::error::{AppError, ErrorBody};
use crate::models::accessibility::Accessibility;
use crate::models::activity::RECENT_LIMIT;
use crate::models::dashboard::*;
use crate::state::AppState;
use crate::utils::activity::{list_items, newest_first};

#[utoipa::path(
    get,
    path = "/",
    tag = "Dashboard",
    operation_id = "getDashboard",
    summary = "Aggregate activity counts",
    description = "Returns the total number of activities, counts per status bucket (upcoming, active, completed, cancelled), counts per type and the five most recently created activities. Legacy status spellings are counted under their canonical bucket.",
    params(crate::models::accessibility::AccessibilityParams),
    responses(
        (status = 200, description = "Dashboard", body = DashboardPage),
        (status = 500, description = "Internal error (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, prefs))]
pub async fn dashboard(
    State(state): State<AppState>,
    prefs: Accessibility,
) -> Result<Json<DashboardPage>, AppError> {
    let by_status = count_by_status(&state.db).await?;
    let total = by_status.sum();
    let by_type = count_by_type(&state.db).await?;

    let recent_models = newest_first(activity::Entity::find())
        .limit(Some(RECENT_LIMIT))
        .all(&state.db)
        .await?;
    let recent = list_items(&state.db, recent_models).await?;

    Ok(Json(DashboardPage {
        total,
        by_status,
        by_type,
        recent,
        accessibility: prefs,
    }))
}

/// Group by the raw stored status so legacy spellings are folded into their
/// canonical bucket. Unrecognised values count under the default status, the
/// same way a single row reads them.
async fn count_by_status<C: ConnectionTrait>(db: &C) -> Result<StatusCounts, AppError> {
    let rows: Vec<(String, i64)> = activity::Entity::find()
        .select_only()
        .column(activity::Column::Status)
        .column_as(
            Expr::expr(Func::count(Expr::col(activity::Column::Id))),
            "count",
        )
        .group_by(activity::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    let mut counts = StatusCounts::default();
    for (raw, count) in rows {
        let status = ActivityStatus::normalize(&raw).unwrap_or_else(|| {
            tracing::warn!(status = %raw, count, "Unknown activity status in storage");
            ActivityStatus::default()
        });
        counts.add(status.bucket(), Ord::max(count, 0) as u64);
    }
    Ok(counts)
}

async fn count_by_type<C: ConnectionTrait>(db: &C) -> Result<Vec<TypeCount>, AppError> {
    let rows: Vec<(String, i64)> = activity::Entity::find()
        .select_only()
        .column(activity::Column::ActivityType)
        .column_as(
            Expr::expr(Func::count(Expr::col(activity::Column::Id))),
            "count",
        )
        .group_by(activity::Column::ActivityType)
        .into_tuple()
        .all(db)
        .await?;

    let mut by_type: HashMap<ActivityType, u64> = HashMap::new();
    for (raw, count) in rows {
        match raw.parse::<ActivityType>() {
            Ok(t) => *by_type.entry(t).or_default() += Ord::max(count, 0) as u64,
            Err(e) => tracing::warn!(error = %e, count, "Unknown activity type in storage"),
        }
    }

    Ok(ActivityType::ALL
        .iter()
        .map(|&t| TypeCount {
            activity_type: t,
            label: t.label(),
            count: by_type.get(&t).copied().unwrap_or(0),
        })
        .collect())
}
