use common::{ActivityStatus, ActivityType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "type")]
    pub activity_type: ActivityType,
    /// Raw stored spelling; read it through [`Model::canonical_status`].
    pub status: String,

    pub start_date: Date,
    pub end_date: Date,
    pub time: Option<String>, // free text, e.g. "19:00 - 22:00"
    pub location: String,
    pub coordinator: String,
    pub participants: i32,
    pub image_url: Option<String>,

    #[sea_orm(has_many, via = "activity_tag_link")]
    pub tags: HasMany<super::activity_tag::Entity>,

    #[sea_orm(has_many)]
    pub requirements: HasMany<super::activity_requirement::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// The canonical status for this row. Legacy spellings map to their
    /// canonical status; anything unrecognised reads as the default.
    pub fn canonical_status(&self) -> ActivityStatus {
        ActivityStatus::normalize(&self.status).unwrap_or_else(|| {
            tracing::warn!(
                id = self.id,
                status = %self.status,
                "Unknown activity status in storage"
            );
            ActivityStatus::default()
        })
    }
}

impl ActiveModelBehavior for ActiveModel {}
