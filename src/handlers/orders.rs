use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::{
    auth::CurrentUser,
    errors::ApiError,
    handlers::common::{map_service_error, success_response},
    AppState,
};

pub fn orders_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_my_orders))
        .route("/:id", get(get_order))
}

/// The authenticated user's order history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Own orders"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_my_orders(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user
        .require_authenticated()
        .map_err(map_service_error)?;
    let orders = state
        .services
        .orders
        .list_orders_for_user(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

/// One order; owners see their own, admins see all.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "orders",
    responses(
        (status = 200, description = "The order with its dishes"),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user = current_user
        .require_authenticated()
        .map_err(map_service_error)?;
    let order = state
        .services
        .orders
        .get_order_for_user(id, &user)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}
