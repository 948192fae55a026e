use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::CurrentUser,
    entities::UserModel,
    errors::ApiError,
    handlers::common::{created_response, map_service_error, success_response},
    services::users::RegisterInput,
    AppState,
};

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// Create an account and log straight in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; token issued"),
        (status = 400, description = "Invalid name, email, or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .register(RegisterInput {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await
        .map_err(map_service_error)?;

    let token = state.auth.issue_token(&user).map_err(map_service_error)?;
    Ok(created_response(TokenResponse::new(&state, token, user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .authenticate(&payload.email, &payload.password)
        .await
        .map_err(map_service_error)?;

    let token = state.auth.issue_token(&user).map_err(map_service_error)?;
    Ok(success_response(TokenResponse::new(&state, token, user)))
}

/// The authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(current_user: CurrentUser) -> Result<impl IntoResponse, ApiError> {
    let user = current_user
        .require_authenticated()
        .map_err(map_service_error)?;
    Ok(success_response(user))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: usize,
    pub user: UserModel,
}

impl TokenResponse {
    fn new(state: &AppState, access_token: String, user: UserModel) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.auth.token_lifetime_secs(),
            user,
        }
    }
}
