//! Stock and transaction summary for the back-office dashboard.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::catalog::EntityType;
use crate::db::{DatabaseAccess, DbPool};
use crate::entities::{product, transaction, TransactionType};
use crate::errors::ServiceError;
use crate::services::catalog::{CatalogService, Record};

/// Optional narrowing of the summary. Timestamps are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryFilter {
    /// Warehouse key
    pub warehouse: Option<String>,
    /// Audit session key; applies to transactions only
    pub audit_session: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl SummaryFilter {
    fn validate(&self) -> Result<(), ServiceError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start > end => Err(ServiceError::bad_request(
                "'start' must not be after 'end'",
            )),
            _ => Ok(()),
        }
    }

    fn product_condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(warehouse) = &self.warehouse {
            condition = condition.add(product::Column::WarehouseId.eq(warehouse.clone()));
        }
        condition
    }

    fn transaction_condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(warehouse) = &self.warehouse {
            condition = condition.add(transaction::Column::WarehouseId.eq(warehouse.clone()));
        }
        if let Some(session) = &self.audit_session {
            condition = condition.add(transaction::Column::AuditSessionId.eq(session.clone()));
        }
        if let Some(start) = self.start {
            condition = condition.add(transaction::Column::CreatedAt.gte(start));
        }
        if let Some(end) = self.end {
            condition = condition.add(transaction::Column::CreatedAt.lte(end));
        }
        condition
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryReport {
    pub total_products: u64,
    /// Products whose current stock is above zero
    pub counted_products: u64,
    pub uncounted_products: u64,
    /// Sum of current stock over the selected products
    pub total_stock: i64,
    pub total_counts: u64,
    pub total_ins: u64,
    pub total_outs: u64,
    /// Transactions carrying a type code this build does not know
    pub total_other: u64,
    /// Matching transactions, newest first
    pub recent_transactions: Vec<Record>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TypeCounts {
    count: u64,
    ins: u64,
    outs: u64,
    other: u64,
}

impl TypeCounts {
    fn add(&mut self, code: &str, n: u64) {
        match TransactionType::from(code) {
            TransactionType::Count => self.count += n,
            TransactionType::In => self.ins += n,
            TransactionType::Out => self.outs += n,
            TransactionType::Other(_) => self.other += n,
        }
    }
}

pub struct ReportService {
    db: DatabaseAccess,
    catalog: Arc<CatalogService>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>, catalog: Arc<CatalogService>) -> Self {
        Self {
            db: DatabaseAccess::new(db_pool),
            catalog,
        }
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, filter: &SummaryFilter) -> Result<SummaryReport, ServiceError> {
        filter.validate()?;

        let products = filter.product_condition();
        let total_products = self
            .db
            .execute("reports.total_products", |db| {
                product::Entity::find().filter(products.clone()).count(db)
            })
            .await?;
        let counted_products = self
            .db
            .execute("reports.counted_products", |db| {
                product::Entity::find()
                    .filter(products.clone())
                    .filter(product::Column::CurrentStock.gt(0))
                    .count(db)
            })
            .await?;
        let total_stock: Option<Option<i64>> = self
            .db
            .execute("reports.total_stock", |db| {
                product::Entity::find()
                    .filter(products.clone())
                    .select_only()
                    .column_as(
                        Expr::col((product::Entity, product::Column::CurrentStock)).sum(),
                        "total_stock",
                    )
                    .into_tuple::<Option<i64>>()
                    .one(db)
            })
            .await?;

        let transactions = filter.transaction_condition();
        let per_type: Vec<(String, i64)> = self
            .db
            .execute("reports.transactions_by_type", |db| {
                transaction::Entity::find()
                    .filter(transactions.clone())
                    .select_only()
                    .column(transaction::Column::Kind)
                    .column_as(
                        Expr::col((transaction::Entity, transaction::Column::Id)).count(),
                        "transactions",
                    )
                    .group_by(transaction::Column::Kind)
                    .into_tuple::<(String, i64)>()
                    .all(db)
            })
            .await?;
        let mut counts = TypeCounts::default();
        for (code, n) in &per_type {
            counts.add(code, u64::try_from(*n).unwrap_or_default());
        }

        let limit = self.catalog.page_size();
        let recent = self
            .db
            .execute("reports.recent_transactions", |db| {
                transaction::Entity::find()
                    .filter(transactions)
                    .order_by(transaction::Column::CreatedAt, Order::Desc)
                    .order_by(transaction::Column::Id, Order::Desc)
                    .limit(limit)
                    .all(db)
            })
            .await?;
        let recent_transactions = self
            .catalog
            .project::<transaction::Entity>(
                &recent,
                EntityType::Transaction.descriptor().list_descriptors().collect(),
            )
            .await?;

        info!(
            total_products,
            transactions = per_type.iter().map(|(_, n)| n).sum::<i64>(),
            "summary report generated"
        );

        Ok(SummaryReport {
            total_products,
            counted_products,
            uncounted_products: total_products.saturating_sub(counted_products),
            total_stock: total_stock.flatten().unwrap_or(0),
            total_counts: counts.count,
            total_ins: counts.ins,
            total_outs: counts.outs,
            total_other: counts.other,
            recent_transactions,
        })
    }
}
