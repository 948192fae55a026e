use axum::{response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
