use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::codes::SessionStatus;

/// Stock-taking campaign over one warehouse.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "AuditSession")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(column_name = "warehouseId")]
    pub warehouse_id: String,

    pub name: String,

    pub status: SessionStatus,

    /// Whether outflow transactions may be posted while the session runs.
    #[sea_orm(column_name = "allowOutflow")]
    pub allow_outflow: bool,

    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[sea_orm(column_name = "completedAt", nullable)]
    pub completed_at: Option<DateTime<Utc>>,
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
