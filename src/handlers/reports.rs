use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use tracing::info;

use super::common::success_response;
use crate::handlers::AppState;
use crate::services::reports::{SummaryFilter, SummaryReport};
use crate::ApiResult;

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/summary", get(summary_report))
}

/// Stock and transaction totals, optionally narrowed by warehouse, audit
/// session and time window.
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(SummaryFilter),
    responses(
        (status = 200, description = "Summary report", body = crate::ApiResponse<SummaryReport>),
        (status = 400, description = "Invalid time window", body = crate::errors::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn summary_report(
    State(state): State<AppState>,
    Query(filter): Query<SummaryFilter>,
) -> ApiResult<SummaryReport> {
    let report = state.reports.summary(&filter).await?;

    info!(
        warehouse = filter.warehouse.as_deref().unwrap_or("*"),
        total_products = report.total_products,
        "generated summary report"
    );

    success_response(report)
}
