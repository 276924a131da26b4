use std::collections::HashMap;

use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, OnConflict};
use sea_orm::*;

use common::ActivityStatus;

use crate::entity::{activity, activity_requirement, activity_tag, activity_tag_link};
use crate::error::AppError;
use crate::models::activity::{ActivityDraft, ActivityFilter, ActivityListItem};
use crate::models::shared::{LIKE_ESCAPE, escape_like};

/// Look up an activity by ID, returning 404 if not found.
pub async fn find_activity<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<activity::Model, AppError> {
    activity::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity not found".into()))
}

/// Restrict a query to the activities matching `filter`.
///
/// Status matches every stored spelling of the canonical status, so rows
/// still carrying a legacy value are found too. Unrecognised stored values
/// read as the default status and are matched with it.
pub fn apply_filter(
    mut select: Select<activity::Entity>,
    filter: &ActivityFilter,
) -> Select<activity::Entity> {
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", escape_like(search).to_lowercase());
        let mut any = Condition::any();
        for column in [
            activity::Column::Title,
            activity::Column::Description,
            activity::Column::Coordinator,
            activity::Column::Location,
        ] {
            any = any.add(
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
            );
        }
        select = select.filter(any);
    }
    if let Some(activity_type) = filter.activity_type {
        select = select.filter(activity::Column::ActivityType.eq(activity_type));
    }
    if let Some(status) = filter.status {
        let mut cond = Condition::any()
            .add(activity::Column::Status.is_in(status.stored_values().iter().copied()));
        if status == ActivityStatus::default() {
            cond = cond
                .add(activity::Column::Status.is_not_in(ActivityStatus::known_stored_values()));
        }
        select = select.filter(cond);
    }
    if let Some(from) = filter.start_date {
        select = select.filter(activity::Column::StartDate.gte(from));
    }
    if let Some(until) = filter.end_date {
        select = select.filter(activity::Column::StartDate.lte(until));
    }
    select
}

/// Newest first; ties broken by ID so pages are stable.
pub fn newest_first(select: Select<activity::Entity>) -> Select<activity::Entity> {
    select
        .order_by_desc(activity::Column::CreatedAt)
        .order_by_desc(activity::Column::Id)
}

/// Tag names of each activity in `activity_ids`, sorted by name.
pub async fn load_tag_names<C: ConnectionTrait>(
    db: &C,
    activity_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, AppError> {
    let mut by_activity: HashMap<i32, Vec<String>> = HashMap::new();
    if activity_ids.is_empty() {
        return Ok(by_activity);
    }

    let links: Vec<(i32, i32)> = activity_tag_link::Entity::find()
        .filter(activity_tag_link::Column::ActivityId.is_in(activity_ids.to_vec()))
        .select_only()
        .column(activity_tag_link::Column::ActivityId)
        .column(activity_tag_link::Column::TagId)
        .into_tuple()
        .all(db)
        .await?;
    if links.is_empty() {
        return Ok(by_activity);
    }

    let mut tag_ids: Vec<i32> = links.iter().map(|&(_, tag_id)| tag_id).collect();
    tag_ids.sort_unstable();
    tag_ids.dedup();
    let names: HashMap<i32, String> = activity_tag::Entity::find()
        .filter(activity_tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    for (activity_id, tag_id) in links {
        if let Some(name) = names.get(&tag_id) {
            by_activity
                .entry(activity_id)
                .or_default()
                .push(name.clone());
        }
    }
    for tags in by_activity.values_mut() {
        tags.sort();
    }
    Ok(by_activity)
}

/// Listing cards for `models`, in the same order, with their tag names.
pub async fn list_items<C: ConnectionTrait>(
    db: &C,
    models: Vec<activity::Model>,
) -> Result<Vec<ActivityListItem>, AppError> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut tags = load_tag_names(db, &ids).await?;
    Ok(models
        .into_iter()
        .map(|m| {
            let names = tags.remove(&m.id).unwrap_or_default();
            ActivityListItem::new(m, names)
        })
        .collect())
}

/// Tags of one activity, sorted by name.
pub async fn load_tags<C: ConnectionTrait>(
    db: &C,
    activity_id: i32,
) -> Result<Vec<activity_tag::Model>, AppError> {
    let tag_ids: Vec<i32> = activity_tag_link::Entity::find()
        .filter(activity_tag_link::Column::ActivityId.eq(activity_id))
        .select_only()
        .column(activity_tag_link::Column::TagId)
        .into_tuple()
        .all(db)
        .await?;
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(activity_tag::Entity::find()
        .filter(activity_tag::Column::Id.is_in(tag_ids))
        .order_by_asc(activity_tag::Column::Name)
        .all(db)
        .await?)
}

/// Requirements of one activity, in the order they were entered.
pub async fn load_requirements<C: ConnectionTrait>(
    db: &C,
    activity_id: i32,
) -> Result<Vec<activity_requirement::Model>, AppError> {
    Ok(activity_requirement::Entity::find()
        .filter(activity_requirement::Column::ActivityId.eq(activity_id))
        .order_by_asc(activity_requirement::Column::Id)
        .all(db)
        .await?)
}

/// Return the tag called `name`, creating it if it does not exist yet.
///
/// The insert ignores unique-name conflicts so two writers creating the same
/// tag both end up with the single surviving row.
pub async fn get_or_create_tag<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<activity_tag::Model, AppError> {
    if let Some(tag) = find_tag_by_name(db, name).await? {
        return Ok(tag);
    }

    let result = activity_tag::Entity::insert(activity_tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(activity_tag::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await;
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    find_tag_by_name(db, name)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Tag '{name}' vanished after insert")))
}

async fn find_tag_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<Option<activity_tag::Model>, AppError> {
    Ok(activity_tag::Entity::find()
        .filter(activity_tag::Column::Name.eq(name))
        .one(db)
        .await?)
}

/// Replace the activity's tag set wholesale with `names`.
pub async fn replace_tags<C: ConnectionTrait>(
    db: &C,
    activity_id: i32,
    names: &[String],
) -> Result<(), AppError> {
    let mut tag_ids: Vec<i32> = Vec::with_capacity(names.len());
    for name in names {
        let tag = get_or_create_tag(db, name).await?;
        if !tag_ids.contains(&tag.id) {
            tag_ids.push(tag.id);
        }
    }

    activity_tag_link::Entity::delete_many()
        .filter(activity_tag_link::Column::ActivityId.eq(activity_id))
        .exec(db)
        .await?;

    if !tag_ids.is_empty() {
        let links = tag_ids.into_iter().map(|tag_id| activity_tag_link::ActiveModel {
            activity_id: Set(activity_id),
            tag_id: Set(tag_id),
        });
        activity_tag_link::Entity::insert_many(links)
            .exec_without_returning(db)
            .await?;
    }
    Ok(())
}

/// Delete every requirement of the activity and insert `lines` in order.
pub async fn replace_requirements<C: ConnectionTrait>(
    db: &C,
    activity_id: i32,
    lines: &[String],
) -> Result<(), AppError> {
    activity_requirement::Entity::delete_many()
        .filter(activity_requirement::Column::ActivityId.eq(activity_id))
        .exec(db)
        .await?;

    if !lines.is_empty() {
        let rows = lines.iter().map(|line| activity_requirement::ActiveModel {
            activity_id: Set(activity_id),
            requirement: Set(line.clone()),
            ..Default::default()
        });
        activity_requirement::Entity::insert_many(rows)
            .exec_without_returning(db)
            .await?;
    }
    Ok(())
}

/// Persist a validated form: the activity row, its tags and its requirements,
/// all in one transaction. `id = None` creates a new activity.
///
/// Any failure (including a missing activity on update) rolls back every step.
pub async fn save_activity(
    db: &DatabaseConnection,
    id: Option<i32>,
    draft: &ActivityDraft,
) -> Result<activity::Model, AppError> {
    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let mut active: activity::ActiveModel = match id {
        Some(id) => find_activity(&txn, id).await?.into(),
        None => activity::ActiveModel {
            created_at: Set(now),
            ..Default::default()
        },
    };
    active.title = Set(draft.title.clone());
    active.description = Set(draft.description.clone());
    active.activity_type = Set(draft.activity_type);
    active.status = Set(draft.status.as_str().to_string());
    active.start_date = Set(draft.start_date);
    active.end_date = Set(draft.end_date);
    active.time = Set(draft.time.clone());
    active.location = Set(draft.location.clone());
    active.coordinator = Set(draft.coordinator.clone());
    active.participants = Set(draft.participants);
    active.image_url = Set(draft.image_url.clone());
    active.updated_at = Set(now);

    let model = match id {
        Some(_) => active.update(&txn).await?,
        None => active.insert(&txn).await?,
    };

    replace_tags(&txn, model.id, &draft.tags).await?;
    replace_requirements(&txn, model.id, &draft.requirements).await?;

    txn.commit().await?;
    Ok(model)
}

/// Delete an activity together with its tag links and requirements.
/// Tags themselves are kept for reuse.
pub async fn delete_activity(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;

    find_activity(&txn, id).await?;

    activity_requirement::Entity::delete_many()
        .filter(activity_requirement::Column::ActivityId.eq(id))
        .exec(&txn)
        .await?;
    activity_tag_link::Entity::delete_many()
        .filter(activity_tag_link::Column::ActivityId.eq(id))
        .exec(&txn)
        .await?;
    activity::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}
