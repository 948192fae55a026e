//! Administrative CRUD over the same persistence the storefront uses:
//! list/search/sort/paginate plus create/update/delete, guarded by the
//! `AdminUser` extractor. Orders are never deleted, only advanced.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::{
    auth::AdminUser,
    errors::ApiError,
    handlers::common::{
        created_response, map_service_error, no_content_response, success_response,
        PaginatedResponse,
    },
    services::catalog::{CategoryInput, DishInput, ListParams},
    services::users::{CreateUserInput, UpdateUserInput},
    AppState,
};

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dishes", get(list_dishes).post(create_dish))
        .route("/dishes/:id", put(update_dish).delete(delete_dish))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/advance", post(advance_order))
}

async fn list_dishes(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (dishes, total) = state
        .services
        .catalog
        .list_dishes(&params)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        dishes,
        total,
        params.page(),
        params.per_page(),
    )))
}

async fn create_dish(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<DishInput>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = state
        .services
        .catalog
        .create_dish(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(dish))
}

async fn update_dish(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(input): Json<DishInput>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = state
        .services
        .catalog
        .update_dish(id, input)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(dish))
}

async fn delete_dish(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_dish(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn list_categories(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .catalog
        .list_categories()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(
        categories
            .into_iter()
            .map(|(category, _)| category)
            .collect::<Vec<_>>(),
    ))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .create_category(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(category))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(input): Json<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .update_category(id, input)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(category))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_category(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (users, total) = state
        .services
        .users
        .list_users(&params)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        users,
        total,
        params.page(),
        params.per_page(),
    )))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<CreateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .create_user(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(user))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    Json(input): Json<UpdateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .update_user(id, input)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .users
        .delete_user(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .orders
        .list_orders(&params)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        orders,
        total,
        params.page(),
        params.per_page(),
    )))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_order_with_dishes(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

/// Advance an order one status step (New -> Processing -> Completed).
#[utoipa::path(
    post,
    path = "/api/v1/admin/orders/{id}/advance",
    tag = "admin",
    responses(
        (status = 200, description = "Order advanced"),
        (status = 400, description = "Order is already completed"),
        (status = 403, description = "Administrator access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn advance_order(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .advance_status(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}
