use std::str::FromStr;

use axum::Json;
use serde::Serialize;

use crate::catalog::EntityType;
use crate::errors::ServiceError;
use crate::{ApiResponse, ApiResult};

/// Wraps `data` in the success envelope.
pub fn success_response<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Resolves an entity slug taken from the path.
///
/// Unknown slugs are a client error, not a missing record.
pub fn parse_entity(slug: &str) -> Result<EntityType, ServiceError> {
    EntityType::from_str(slug)
        .map_err(|_| ServiceError::bad_request(format!("Unknown entity '{slug}'")))
}
