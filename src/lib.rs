//! Food Delivery API Library
//!
//! Catalog browsing, session carts, checkout and order management.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod cart;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod seed;
pub mod services;
pub mod session;

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: Arc<auth::AuthService>,
    pub cart_store: Arc<session::CartStore>,
    pub event_sender: Arc<events::EventSender>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: Arc<events::EventSender>,
    ) -> Self {
        let auth = Arc::new(auth::AuthService::new(auth::AuthConfig {
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiration: config.jwt_expiration,
        }));
        let cart_store = Arc::new(session::CartStore::new());
        let services = handlers::AppServices::new(
            db.clone(),
            auth.clone(),
            cart_store.clone(),
            event_sender.clone(),
        );
        Self {
            db,
            config,
            auth,
            cart_store,
            event_sender,
            services,
        }
    }
}

/// The full application router: health, versioned API and Swagger UI.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "food-delivery-api up" }))
        .merge(handlers::health_routes())
        .nest("/api/v1", handlers::api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
