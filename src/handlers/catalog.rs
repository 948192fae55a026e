use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Serialize;

use crate::{
    entities::{CategoryModel, DishModel},
    errors::ApiError,
    handlers::common::{map_service_error, success_response, PaginatedResponse},
    services::catalog::ListParams,
    AppState,
};

pub fn dishes_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_dishes))
        .route("/:id", get(get_dish))
}

pub fn categories_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id/dishes", get(dishes_in_category))
}

/// List dishes with optional search and sorting.
#[utoipa::path(
    get,
    path = "/api/v1/dishes",
    tag = "catalog",
    responses((status = 200, description = "Paginated dish listing"))
)]
pub async fn list_dishes(
    State(state): State<Arc<AppState>>,
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

/// A single dish by id.
#[utoipa::path(
    get,
    path = "/api/v1/dishes/{id}",
    tag = "catalog",
    responses(
        (status = 200, description = "The dish"),
        (status = 404, description = "Dish not found")
    )
)]
pub async fn get_dish(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let dish = state
        .services
        .catalog
        .get_dish(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(dish))
}

/// The full menu: categories with their dishes.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "catalog",
    responses((status = 200, description = "Categories with dishes"))
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .services
        .catalog
        .list_categories()
        .await
        .map_err(map_service_error)?;

    let menu: Vec<CategoryWithDishes> = categories
        .into_iter()
        .map(|(category, dishes)| CategoryWithDishes { category, dishes })
        .collect();
    Ok(success_response(menu))
}

/// Dishes belonging to one category.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/dishes",
    tag = "catalog",
    responses(
        (status = 200, description = "Dishes in the category"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn dishes_in_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let dishes = state
        .services
        .catalog
        .dishes_in_category(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(dishes))
}

#[derive(Debug, Serialize)]
struct CategoryWithDishes {
    #[serde(flatten)]
    category: CategoryModel,
    dishes: Vec<DishModel>,
}
