use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_requirement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub activity_id: i32,
    #[sea_orm(belongs_to, from = "activity_id", to = "id", on_delete = "Cascade")]
    pub activity: HasOne<super::activity::Entity>,

    pub requirement: String,
}

impl ActiveModelBehavior for ActiveModel {}
