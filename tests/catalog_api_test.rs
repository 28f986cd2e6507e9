mod common;

use axum::http::{Method, StatusCode};
use inventory_admin::entities::product;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde_json::Value;

use common::{response_json, TestApp};

fn ids(body: &Value) -> Vec<String> {
    body["data"]["records"]
        .as_array()
        .expect("records array")
        .iter()
        .map(|r| r["id"].as_str().expect("record id").to_owned())
        .collect()
}

fn field<'a>(record: &'a Value, name: &str) -> &'a Value {
    record["fields"]
        .as_array()
        .expect("fields array")
        .iter()
        .find(|f| f["name"] == name)
        .unwrap_or_else(|| panic!("field {name} missing"))
}

/// Warehouse "Main" holding SKU-001 (stock 42) plus a second product elsewhere.
async fn stocked_app() -> TestApp {
    let app = TestApp::new().await;
    app.seed_warehouse("wh-main", "Main").await;
    app.seed_warehouse("wh-north", "North").await;
    app.seed_product("p-1", "SKU-001", "Blue Widget", "wh-main", 42)
        .await;
    app.seed_product("p-2", "SKU-002", "Red Widget", "wh-north", 0)
        .await;
    app
}

#[tokio::test]
async fn search_by_code_returns_exactly_that_product() {
    let app = stocked_app().await;

    let (status, body) = app
        .get_json("/api/v1/catalog/product/records?q=SKU-001")
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec!["p-1"]);

    let record = &body["data"]["records"][0];
    assert_eq!(field(record, "code")["value"], "SKU-001");
    assert_eq!(field(record, "current_stock")["value"], 42);
    assert_eq!(field(record, "warehouse")["value"], "Main");
}

#[tokio::test]
async fn search_is_case_insensitive_over_every_searchable_field() {
    let app = stocked_app().await;

    let (_, body) = app.get_json("/api/v1/catalog/product/records?q=widget").await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = app.get_json("/api/v1/catalog/product/records?q=RED").await;
    assert_eq!(ids(&body), vec!["p-2"]);

    let (_, body) = app
        .get_json("/api/v1/catalog/product/records?q=blue%20sku")
        .await;
    assert_eq!(ids(&body), vec!["p-1"]);
}

#[tokio::test]
async fn like_wildcards_in_search_are_literal() {
    let app = stocked_app().await;

    let (_, body) = app.get_json("/api/v1/catalog/product/records?q=%25").await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn filter_by_warehouse_key_includes_the_product() {
    let app = stocked_app().await;

    let (status, body) = app
        .get_json("/api/v1/catalog/product/records?warehouse=wh-main")
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["p-1"]);

    // an empty filter value is ignored
    let (_, body) = app
        .get_json("/api/v1/catalog/product/records?warehouse=")
        .await;
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn status_filter_returns_only_matching_sessions() {
    let app = TestApp::new().await;
    app.seed_warehouse("wh-main", "Main").await;
    app.seed_audit_session("as-1", "Spring audit", "wh-main", "open")
        .await;
    app.seed_audit_session("as-2", "Winter audit", "wh-main", "completed")
        .await;

    let (status, body) = app
        .get_json("/api/v1/catalog/audit_session/records?status=open")
        .await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), vec!["as-1"]);
    assert_eq!(field(&body["data"]["records"][0], "status")["value"], "open");
}

#[tokio::test]
async fn fetching_a_transaction_resolves_its_warehouse() {
    let app = stocked_app().await;
    let user = app.seed_user("u-1", "counter").await;
    let product = product::Entity::find_by_id("p-1")
        .one(app.db())
        .await
        .unwrap()
        .expect("seeded product");
    app.seed_transaction("t-1", &product, &user, "in", 5, None)
        .await;

    let (status, body) = app
        .get_json("/api/v1/catalog/transaction/records/t-1")
        .await;
    assert_eq!(status, 200);

    let record = &body["data"];
    assert_eq!(record["id"], "t-1");
    let warehouse = field(record, "warehouse");
    assert_eq!(warehouse["value"], "Main");
    assert_eq!(warehouse["reference"]["entity"], "warehouse");
    assert_eq!(warehouse["reference"]["id"], "wh-main");
    assert_eq!(warehouse["reference"]["found"], true);
    assert_eq!(field(record, "user")["value"], "counter");
    assert_eq!(field(record, "type")["value"], "in");
    assert_eq!(field(record, "audit_session")["value"], Value::Null);
}

#[tokio::test]
async fn dangling_reference_keeps_the_raw_key() {
    let app = TestApp::new().await;
    app.seed_product("p-9", "SKU-009", "Orphan", "wh-gone", 1)
        .await;

    let (status, body) = app.get_json("/api/v1/catalog/product/records/p-9").await;
    assert_eq!(status, 200);
    let warehouse = field(&body["data"], "warehouse");
    assert_eq!(warehouse["value"], "wh-gone");
    assert_eq!(warehouse["reference"]["found"], false);
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let app = stocked_app().await;

    let (status, body) = app
        .get_json("/api/v1/catalog/product/records/does-not-exist")
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Not Found");
    assert!(body.get("data").is_none());
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn unknown_entity_and_fields_are_bad_requests() {
    let app = stocked_app().await;

    let (status, _) = app.get_json("/api/v1/catalog/invoice/records").await;
    assert_eq!(status, 400);

    let (status, body) = app
        .get_json("/api/v1/catalog/product/records?colour=blue")
        .await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("colour"));

    // searchable but not filterable
    let (status, _) = app
        .get_json("/api/v1/catalog/product/records?name=Blue%20Widget")
        .await;
    assert_eq!(status, 400);

    let (status, _) = app
        .get_json("/api/v1/catalog/product/records?sort=created_at")
        .await;
    assert_eq!(status, 400);

    let (status, _) = app.get_json("/api/v1/catalog/product/records?page=0").await;
    assert_eq!(status, 400);

    let (status, _) = app.get_json("/api/v1/catalog/product/records?page=abc").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn page_beyond_any_offset_is_rejected() {
    let app = stocked_app().await;

    for page in ["18446744073709551615", "1000000000000000000"] {
        let (status, body) = app
            .get_json(&format!(
                "/api/v1/catalog/warehouse/records?page={page}&per_page=100"
            ))
            .await;
        assert_eq!(status, 400, "{page}");
        assert_eq!(body["error"], "Bad Request");
    }
}

#[tokio::test]
async fn storage_failures_hide_their_details() {
    let app = stocked_app().await;
    app.db()
        .execute_unprepared(r#"DROP TABLE "Product""#)
        .await
        .expect("drop table");

    let (status, body) = app.get_json("/api/v1/catalog/product/records").await;
    assert_eq!(status, 503);
    assert_eq!(body["message"], "Storage temporarily unavailable");
    assert!(!body.to_string().contains("no such table"));
}

#[tokio::test]
async fn password_is_never_exposed() {
    let app = TestApp::new().await;
    app.seed_user("u-1", "auditor").await;

    let (_, list) = app.get_json("/api/v1/catalog/user/records").await;
    let (_, record) = app.get_json("/api/v1/catalog/user/records/u-1").await;
    let (_, described) = app.get_json("/api/v1/catalog/user").await;

    for body in [&list, &record] {
        let text = body.to_string();
        assert!(!text.contains("pbkdf2"), "{text}");
        assert!(!text.contains("\"password\""), "{text}");
    }
    assert_eq!(record["data"]["title"], "auditor");
    assert!(!described["data"]["list_fields"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "password"));
}

#[tokio::test]
async fn pages_newest_first_and_honours_sort() {
    let app = TestApp::new().await;
    app.seed_warehouse("wh-main", "Main").await;
    for n in 1..=5 {
        app.seed_product(
            &format!("p-{n}"),
            &format!("SKU-00{n}"),
            &format!("Item {n}"),
            "wh-main",
            n,
        )
        .await;
    }

    let (_, first) = app
        .get_json("/api/v1/catalog/product/records?per_page=2")
        .await;
    assert_eq!(ids(&first), vec!["p-5", "p-4"]);
    assert_eq!(first["data"]["total"], 5);
    assert_eq!(first["data"]["total_pages"], 3);

    let (_, last) = app
        .get_json("/api/v1/catalog/product/records?per_page=2&page=3")
        .await;
    assert_eq!(ids(&last), vec!["p-1"]);

    let (_, sorted) = app
        .get_json("/api/v1/catalog/product/records?sort=-current_stock&per_page=1")
        .await;
    assert_eq!(ids(&sorted), vec!["p-5"]);

    let (_, sorted) = app
        .get_json("/api/v1/catalog/product/records?sort=code&per_page=1")
        .await;
    assert_eq!(ids(&sorted), vec!["p-1"]);

    let (_, beyond) = app
        .get_json("/api/v1/catalog/product/records?per_page=2&page=9")
        .await;
    assert_eq!(ids(&beyond), Vec::<String>::new());
}

#[tokio::test]
async fn list_columns_follow_the_catalog() {
    let app = stocked_app().await;

    let (_, body) = app.get_json("/api/v1/catalog/product/records").await;
    assert_eq!(
        body["data"]["columns"],
        serde_json::json!(["code", "name", "warehouse", "current_stock"])
    );
    let names: Vec<&str> = body["data"]["records"][0]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["code", "name", "warehouse", "current_stock"]);
}

#[tokio::test]
async fn filter_choices_label_references_with_display_names() {
    let app = stocked_app().await;

    let (status, body) = app.get_json("/api/v1/catalog/product/filters").await;
    assert_eq!(status, 200);
    let choices = &body["data"][0];
    assert_eq!(choices["field"], "warehouse");
    assert_eq!(
        choices["choices"],
        serde_json::json!([
            { "value": "wh-main", "label": "Main" },
            { "value": "wh-north", "label": "North" }
        ])
    );

    let (_, body) = app.get_json("/api/v1/catalog/warehouse/filters").await;
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn catalog_description_lists_every_entity() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/api/v1/catalog").await;
    assert_eq!(status, 200);
    let entities: Vec<&str> = body["data"]["entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["entity"].as_str().unwrap())
        .collect();
    assert_eq!(
        entities,
        [
            "user",
            "warehouse",
            "product",
            "team",
            "audit_session",
            "count_session",
            "transaction",
            "pending_transaction"
        ]
    );
    assert_eq!(body["data"]["site"]["language_code"], "fa-ir");
}

#[tokio::test]
async fn json_and_pending_records_render() {
    let app = TestApp::new().await;
    app.seed_warehouse("wh-main", "Main").await;
    app.seed_team("team-1", "Night shift", "wh-main").await;
    app.seed_pending_transaction("pt-1").await;

    let (_, team) = app.get_json("/api/v1/catalog/team/records/team-1").await;
    assert_eq!(
        field(&team["data"], "member_ids")["value"],
        serde_json::json!(["u-1", "u-2"])
    );

    let (_, pending) = app
        .get_json("/api/v1/catalog/pending_transaction/records")
        .await;
    assert_eq!(ids(&pending), vec!["pt-1"]);
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/catalog",
            &[("host", "localhost"), ("x-request-id", "req-abc")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-abc");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let body = response_json(response).await;
    assert_eq!(body["meta"]["request_id"], "req-abc");
}

#[tokio::test]
async fn disallowed_host_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/catalog", &[("host", "evil.example")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let relaxed = TestApp::with_config(|cfg| cfg.allowed_hosts = "*".to_string()).await;
    let response = relaxed
        .request(Method::GET, "/api/v1/catalog", &[("host", "evil.example")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_endpoints_answer() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/health/ready").await;
    assert_eq!(status, 200);
    assert_eq!(body["ready"], true);

    let (status, body) = app.get_json("/health/live").await;
    assert_eq!(status, 200);
    assert_eq!(body["alive"], true);

    let (status, body) = app.get_json("/api/v1/status").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["service"], "inventory-admin");
}
