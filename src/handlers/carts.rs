use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    cart::Cart,
    entities::DishModel,
    errors::ApiError,
    handlers::common::{map_service_error, success_response, SessionKey},
    AppState,
};

pub fn cart_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(view_cart))
        .route("/items", post(add_to_cart))
        .route("/items/:dish_id", delete(remove_from_cart))
}

/// The session's cart with its dishes resolved for display.
#[utoipa::path(
    get,
    path = "/api/v1/cart",
    tag = "cart",
    responses(
        (status = 200, description = "Cart contents"),
        (status = 404, description = "A cart dish no longer exists in the catalog")
    )
)]
pub async fn view_cart(
    State(state): State<Arc<AppState>>,
    SessionKey(session_id): SessionKey,
) -> Result<impl IntoResponse, ApiError> {
    let (cart, dishes) = state
        .services
        .cart
        .view(&session_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(CartResponse::new(session_id, cart, dishes)))
}

/// Add a dish to the cart. Idempotent for a dish already present.
#[utoipa::path(
    post,
    path = "/api/v1/cart/items",
    tag = "cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart"),
        (status = 404, description = "Dish not found")
    )
)]
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    SessionKey(session_id): SessionKey,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .cart
        .add_item(&session_id, payload.dish_id)
        .await
        .map_err(map_service_error)?;

    let (cart, dishes) = state
        .services
        .cart
        .view(&session_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(CartResponse::new(session_id, cart, dishes)))
}

/// Remove a dish from the cart.
#[utoipa::path(
    delete,
    path = "/api/v1/cart/items/{dish_id}",
    tag = "cart",
    responses(
        (status = 200, description = "Updated cart"),
        (status = 404, description = "Dish is not in the cart")
    )
)]
pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    SessionKey(session_id): SessionKey,
    Path(dish_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .cart
        .remove_item(&session_id, dish_id)
        .await
        .map_err(map_service_error)?;

    let (cart, dishes) = state
        .services
        .cart
        .view(&session_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(CartResponse::new(session_id, cart, dishes)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub dish_id: i32,
}

/// Cart contents as (dish, captured unit price) pairs for rendering.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub session_id: String,
    pub items: Vec<CartItemView>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub dish: DishModel,
    pub unit_price: i64,
}

impl CartResponse {
    fn new(session_id: String, cart: Cart, dishes: Vec<DishModel>) -> Self {
        // Unit prices come from the cart entries, never from the live catalog.
        let mut by_id: HashMap<i32, DishModel> =
            dishes.into_iter().map(|dish| (dish.id, dish)).collect();
        let items = cart
            .items
            .iter()
            .filter_map(|(dish_id, unit_price)| {
                by_id
                    .remove(dish_id)
                    .map(|dish| CartItemView { dish, unit_price: *unit_price })
            })
            .collect();
        Self {
            session_id,
            items,
            total: cart.total,
        }
    }
}
