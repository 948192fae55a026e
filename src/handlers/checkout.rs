use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    auth::CurrentUser,
    errors::ApiError,
    handlers::common::{created_response, map_service_error, SessionKey},
    services::checkout::CheckoutInput,
    AppState,
};

pub fn checkout_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(checkout))
}

/// Convert the session's cart into an order owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    tag = "checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created; cart cleared"),
        (status = 400, description = "Empty cart or invalid shipping details"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "A cart dish is no longer available")
    )
)]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    SessionKey(session_id): SessionKey,
    current_user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CheckoutInput {
        name: payload.name,
        phone: payload.phone,
        address: payload.address,
    };

    let order = state
        .services
        .checkout
        .checkout(&session_id, input, current_user)
        .await
        .map_err(map_service_error)?;

    // Confirmation payload: the order plus its dish snapshot.
    let confirmation = state
        .services
        .orders
        .get_order_with_dishes(order.id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(confirmation))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
}
