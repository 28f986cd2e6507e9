#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use inventory_admin::{
    config::AppConfig,
    db,
    entities::{
        audit_session, count_session, pending_transaction, product, team, transaction, user,
        warehouse, SessionStatus, TransactionType, UserRole,
    },
    AppState,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseBackend as DbBackend, Set, Statement};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Tables as the stock-taking system creates them: quoted PascalCase tables,
/// camelCase columns.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE "User" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "username" TEXT NOT NULL UNIQUE,
        "password" TEXT NOT NULL,
        "role" TEXT NOT NULL,
        "createdAt" TEXT NOT NULL
    );"#,
    r#"CREATE TABLE "Warehouse" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "name" TEXT NOT NULL,
        "description" TEXT,
        "isActive" BOOLEAN NOT NULL,
        "createdAt" TEXT NOT NULL
    );"#,
    r#"CREATE TABLE "Product" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "code" TEXT NOT NULL,
        "name" TEXT NOT NULL,
        "warehouseId" TEXT NOT NULL,
        "currentStock" INTEGER NOT NULL,
        "createdAt" TEXT NOT NULL,
        "updatedAt" TEXT NOT NULL
    );"#,
    r#"CREATE TABLE "Team" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "name" TEXT NOT NULL,
        "warehouseId" TEXT NOT NULL,
        "memberIds" TEXT NOT NULL,
        "createdAt" TEXT NOT NULL
    );"#,
    r#"CREATE TABLE "AuditSession" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "warehouseId" TEXT NOT NULL,
        "name" TEXT NOT NULL,
        "status" TEXT NOT NULL,
        "allowOutflow" BOOLEAN NOT NULL,
        "createdAt" TEXT NOT NULL,
        "completedAt" TEXT
    );"#,
    r#"CREATE TABLE "CountSession" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "auditSessionId" TEXT NOT NULL,
        "teamId" TEXT NOT NULL,
        "name" TEXT NOT NULL,
        "status" TEXT NOT NULL,
        "createdAt" TEXT NOT NULL,
        "completedAt" TEXT
    );"#,
    r#"CREATE TABLE "Transaction" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "productId" TEXT NOT NULL,
        "productCode" TEXT NOT NULL,
        "productName" TEXT NOT NULL,
        "warehouseId" TEXT NOT NULL,
        "type" TEXT NOT NULL,
        "quantity" INTEGER NOT NULL,
        "previousStock" INTEGER NOT NULL,
        "newStock" INTEGER NOT NULL,
        "userId" TEXT NOT NULL,
        "username" TEXT NOT NULL,
        "auditSessionId" TEXT,
        "countSessionId" TEXT,
        "isSynced" BOOLEAN NOT NULL,
        "createdAt" TEXT NOT NULL
    );"#,
    r#"CREATE TABLE "PendingTransaction" (
        "id" TEXT PRIMARY KEY NOT NULL,
        "data" TEXT NOT NULL,
        "createdAt" TEXT NOT NULL
    );"#,
];

/// Helper harness for spinning up an application state backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    /// Seed timestamps count up from here so default ordering is predictable.
    clock: std::sync::atomic::AtomicI64,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Construct a test application, letting the caller adjust the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_000,
            "test".to_string(),
        );
        // a single connection keeps the in-memory database alive for the whole test
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        for sql in SCHEMA {
            pool.execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
                .await
                .expect("failed to create table");
        }

        let state = AppState::new(Arc::new(pool), cfg);
        let router = inventory_admin::app(state.clone());

        Self {
            router,
            state,
            clock: std::sync::atomic::AtomicI64::new(0),
        }
    }

    pub fn db(&self) -> &sea_orm::DatabaseConnection {
        self.state.db.as_ref()
    }

    /// Next seed timestamp, one minute after the previous one.
    pub fn tick(&self) -> DateTime<Utc> {
        let step = self
            .clock
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        base_time() + Duration::minutes(step)
    }

    /// Send a GET against the router as `localhost`.
    pub async fn get(&self, uri: &str) -> Response {
        self.request(Method::GET, uri, &[("host", "localhost")]).await
    }

    pub async fn request(&self, method: Method, uri: &str, headers: &[(&str, &str)]) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// GET returning the status and the parsed JSON body.
    pub async fn get_json(&self, uri: &str) -> (u16, Value) {
        let response = self.get(uri).await;
        let status = response.status().as_u16();
        (status, response_json(response).await)
    }

    pub async fn seed_user(&self, id: &str, username: &str) -> user::Model {
        user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(username.to_string()),
            password: Set("pbkdf2_sha256$600000$salt$hash".to_string()),
            role: Set(UserRole::User),
            created_at: Set(self.tick()),
        }
        .insert(self.db())
        .await
        .expect("insert user")
    }

    pub async fn seed_warehouse(&self, id: &str, name: &str) -> warehouse::Model {
        warehouse::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            description: Set(None),
            is_active: Set(true),
            created_at: Set(self.tick()),
        }
        .insert(self.db())
        .await
        .expect("insert warehouse")
    }

    pub async fn seed_product(
        &self,
        id: &str,
        code: &str,
        name: &str,
        warehouse_id: &str,
        stock: i32,
    ) -> product::Model {
        let now = self.tick();
        product::ActiveModel {
            id: Set(id.to_string()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            warehouse_id: Set(warehouse_id.to_string()),
            current_stock: Set(stock),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await
        .expect("insert product")
    }

    pub async fn seed_team(&self, id: &str, name: &str, warehouse_id: &str) -> team::Model {
        team::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            warehouse_id: Set(warehouse_id.to_string()),
            member_ids: Set(json!(["u-1", "u-2"])),
            created_at: Set(self.tick()),
        }
        .insert(self.db())
        .await
        .expect("insert team")
    }

    pub async fn seed_audit_session(
        &self,
        id: &str,
        name: &str,
        warehouse_id: &str,
        status: &str,
    ) -> audit_session::Model {
        audit_session::ActiveModel {
            id: Set(id.to_string()),
            warehouse_id: Set(warehouse_id.to_string()),
            name: Set(name.to_string()),
            status: Set(SessionStatus::from(status)),
            allow_outflow: Set(false),
            created_at: Set(self.tick()),
            completed_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("insert audit session")
    }

    pub async fn seed_count_session(
        &self,
        id: &str,
        audit_session_id: &str,
        team_id: &str,
    ) -> count_session::Model {
        count_session::ActiveModel {
            id: Set(id.to_string()),
            audit_session_id: Set(audit_session_id.to_string()),
            team_id: Set(team_id.to_string()),
            name: Set(format!("count {id}")),
            status: Set(SessionStatus::Active),
            created_at: Set(self.tick()),
            completed_at: Set(None),
        }
        .insert(self.db())
        .await
        .expect("insert count session")
    }

    /// Posts a movement of `quantity` for `product` by `user`.
    pub async fn seed_transaction(
        &self,
        id: &str,
        product: &product::Model,
        user: &user::Model,
        kind: &str,
        quantity: i32,
        audit_session_id: Option<&str>,
    ) -> transaction::Model {
        transaction::ActiveModel {
            id: Set(id.to_string()),
            product_id: Set(product.id.clone()),
            product_code: Set(product.code.clone()),
            product_name: Set(product.name.clone()),
            warehouse_id: Set(product.warehouse_id.clone()),
            kind: Set(TransactionType::from(kind)),
            quantity: Set(quantity),
            previous_stock: Set(product.current_stock),
            new_stock: Set(product.current_stock + quantity),
            user_id: Set(user.id.clone()),
            username: Set(user.username.clone()),
            audit_session_id: Set(audit_session_id.map(str::to_owned)),
            count_session_id: Set(None),
            is_synced: Set(true),
            created_at: Set(self.tick()),
        }
        .insert(self.db())
        .await
        .expect("insert transaction")
    }

    pub async fn seed_pending_transaction(&self, id: &str) -> pending_transaction::Model {
        pending_transaction::ActiveModel {
            id: Set(id.to_string()),
            data: Set(json!({ "productCode": "SKU-001", "quantity": 3 })),
            created_at: Set(self.tick()),
        }
        .insert(self.db())
        .await
        .expect("insert pending transaction")
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
