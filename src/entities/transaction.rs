use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::codes::TransactionType;

/// Stock movement posted by the writer.
///
/// `product_code`, `product_name` and `username` are snapshots taken when the
/// movement was posted. They are kept exactly as stored and are expected to
/// drift from the live `Product` and `User` rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    #[sea_orm(column_name = "productId")]
    pub product_id: String,

    #[sea_orm(column_name = "productCode")]
    pub product_code: String,

    #[sea_orm(column_name = "productName")]
    pub product_name: String,

    #[sea_orm(column_name = "warehouseId")]
    pub warehouse_id: String,

    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub quantity: i32,

    #[sea_orm(column_name = "previousStock")]
    pub previous_stock: i32,

    #[sea_orm(column_name = "newStock")]
    pub new_stock: i32,

    #[sea_orm(column_name = "userId")]
    pub user_id: String,

    pub username: String,

    #[sea_orm(column_name = "auditSessionId", nullable)]
    pub audit_session_id: Option<String>,

    #[sea_orm(column_name = "countSessionId", nullable)]
    pub count_session_id: Option<String>,

    #[sea_orm(column_name = "isSynced")]
    pub is_synced: bool,

    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::audit_session::Entity",
        from = "Column::AuditSessionId",
        to = "super::audit_session::Column::Id"
    )]
    AuditSession,
    #[sea_orm(
        belongs_to = "super::count_session::Entity",
        from = "Column::CountSessionId",
        to = "super::count_session::Column::Id"
    )]
    CountSession,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
