use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use super::common::{parse_entity, success_response};
use crate::catalog::EntityInfo;
use crate::handlers::AppState;
use crate::services::catalog::{CatalogDescription, FieldChoices, ListQuery, Record, RecordPage};
use crate::ApiResult;

/// Documented list parameters. Any other query key is read as an exact-match
/// filter on a filterable field, e.g. `?warehouse=wh-1&type=IN`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ListParams {
    /// 1-based page number (default 1)
    page: Option<u64>,
    /// Page size, capped by `api_max_page_size`
    per_page: Option<u64>,
    /// Case-insensitive search over the searchable fields
    q: Option<String>,
    /// List field to order by, `-` prefix for descending
    sort: Option<String>,
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(describe_catalog))
        .route("/:entity", get(describe_entity))
        .route("/:entity/records", get(list_records))
        .route("/:entity/records/:id", get(get_record))
        .route("/:entity/filters", get(list_filter_choices))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    responses(
        (status = 200, description = "Site metadata and every entity's catalog entry", body = crate::ApiResponse<CatalogDescription>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        )
    ),
    tag = "catalog"
)]
pub async fn describe_catalog(State(state): State<AppState>) -> ApiResult<CatalogDescription> {
    success_response(state.catalog.describe())
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/{entity}",
    params(
        ("entity" = String, Path, description = "Entity slug, e.g. `product`")
    ),
    responses(
        (status = 200, description = "Catalog entry", body = crate::ApiResponse<EntityInfo>),
        (status = 400, description = "Unknown entity", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn describe_entity(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> ApiResult<EntityInfo> {
    let entity = parse_entity(&entity)?;
    success_response(state.catalog.describe_entity(entity))
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/{entity}/records",
    params(
        ("entity" = String, Path, description = "Entity slug"),
        ListParams
    ),
    responses(
        (status = 200, description = "Page of records", body = crate::ApiResponse<RecordPage>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Unknown entity, field or malformed parameter", body = crate::errors::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_records(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<RecordPage> {
    let entity = parse_entity(&entity)?;
    let query = ListQuery::from_pairs(pairs)?;
    let page = state.catalog.list(entity, &query).await?;

    info!(
        entity = %entity,
        page = page.page,
        returned = page.records.len(),
        total = page.total,
        "listed catalog records"
    );

    success_response(page)
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/{entity}/records/{id}",
    params(
        ("entity" = String, Path, description = "Entity slug"),
        ("id" = String, Path, description = "Primary key")
    ),
    responses(
        (status = 200, description = "Record with references resolved", body = crate::ApiResponse<Record>),
        (status = 400, description = "Unknown entity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_record(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, String)>,
) -> ApiResult<Record> {
    let entity = parse_entity(&entity)?;
    success_response(state.catalog.fetch(entity, &id).await?)
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog/{entity}/filters",
    params(
        ("entity" = String, Path, description = "Entity slug")
    ),
    responses(
        (status = 200, description = "Distinct values per filterable field", body = crate::ApiResponse<Vec<FieldChoices>>),
        (status = 400, description = "Unknown entity", body = crate::errors::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_filter_choices(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> ApiResult<Vec<FieldChoices>> {
    let entity = parse_entity(&entity)?;
    success_response(state.catalog.filter_choices(entity).await?)
}
