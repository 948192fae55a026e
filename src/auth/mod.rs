//! Authentication: argon2 password hashing, JWT issuance/verification, and
//! the `CurrentUser` extractor that resolves a bearer token to a persisted
//! user. A request without credentials resolves to `CurrentUser::Anonymous`;
//! an invalid or stale token is rejected outright.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{self, user},
    errors::{ApiError, ServiceError},
    AppState,
};

/// JWT claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    /// Expiration time (unix seconds)
    pub exp: usize,
    /// Issued at (unix seconds)
    pub iat: usize,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub jwt_expiration: usize,
}

/// Issues and verifies tokens, and owns the password hashing policy.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn token_lifetime_secs(&self) -> usize {
        self.config.jwt_expiration
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::InternalError(format!("password hashing failed: {}", e)))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| ServiceError::InternalError(format!("stored hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.jwt_expiration as i64);
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token encoding failed: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized("invalid or expired token".to_string()))
    }
}

/// Tagged identity of the requester. Callers pattern-match instead of probing
/// an `is_authenticated` flag.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Anonymous,
    Authenticated(user::Model),
}

impl CurrentUser {
    /// The persisted user, or `Unauthorized` for anonymous visitors.
    pub fn require_authenticated(self) -> Result<user::Model, ServiceError> {
        match self {
            CurrentUser::Authenticated(user) => Ok(user),
            CurrentUser::Anonymous => Err(ServiceError::Unauthorized(
                "authentication required".to_string(),
            )),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(CurrentUser::Anonymous);
        };
        let value = value
            .to_str()
            .map_err(|_| ApiError::Unauthorized("malformed authorization header".to_string()))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

        let claims = state.auth.verify_token(token).map_err(ApiError::Service)?;
        let user_id: i32 = claims
            .sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("invalid token subject".to_string()))?;

        let user = entities::User::find_by_id(user_id)
            .one(&*state.db)
            .await
            .map_err(|e| ApiError::Service(e.into()))?
            .ok_or_else(|| ApiError::Unauthorized("user no longer exists".to_string()))?;

        Ok(CurrentUser::Authenticated(user))
    }
}

/// Extractor for the admin surface: a resolved user with `is_admin` set.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        let user = current.require_authenticated().map_err(ApiError::Service)?;
        if !user.is_admin {
            return Err(ApiError::Service(ServiceError::Forbidden(
                "administrator access required".to_string(),
            )));
        }
        Ok(AdminUser(user))
    }
}
