use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Team")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    pub name: String,

    #[sea_orm(column_name = "warehouseId")]
    pub warehouse_id: String,

    /// JSON array of `User.id` values. Membership integrity is the writer's concern.
    #[sea_orm(column_name = "memberIds", column_type = "Json")]
    pub member_ids: Json,

    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Member ids as strings, skipping any element that is not a string.
    pub fn members(&self) -> Vec<&str> {
        self.member_ids
            .as_array()
            .map(|ids| ids.iter().filter_map(|id| id.as_str()).collect())
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(has_many = "super::count_session::Entity")]
    CountSessions,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::count_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CountSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
