use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    errors::{ApiError, ServiceError},
    session::CartStore,
    AppState,
};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::Service(err)
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, per_page: u64) -> Self {
        Self {
            items,
            total,
            page,
            per_page,
        }
    }
}

/// The visitor's session key, taken from the `X-Session-Id` header. A request
/// without one gets a fresh key; cart responses echo it back so the client
/// can keep using it.
#[derive(Debug, Clone)]
pub struct SessionKey(pub String);

pub const SESSION_HEADER: &str = "x-session-id";

#[async_trait]
impl FromRequestParts<Arc<AppState>> for SessionKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get(SESSION_HEADER) {
            Some(value) => {
                let value = value.to_str().map_err(|_| {
                    ApiError::ValidationError("malformed session id header".to_string())
                })?;
                if value.trim().is_empty() {
                    return Err(ApiError::ValidationError(
                        "session id must not be empty".to_string(),
                    ));
                }
                Ok(SessionKey(value.to_string()))
            }
            None => Ok(SessionKey(CartStore::new_session_id())),
        }
    }
}
