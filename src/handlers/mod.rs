pub mod admin;
pub mod auth;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod common;
pub mod health;
pub mod orders;

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;

use crate::{
    auth::AuthService,
    events::EventSender,
    services::{CartService, CatalogService, CheckoutService, OrderService, UserService},
    session::CartStore,
    AppState,
};

/// All services the HTTP layer dispatches into.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    pub cart: CartService,
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub users: UserService,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        auth: Arc<AuthService>,
        cart_store: Arc<CartStore>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(db.clone()),
            cart: CartService::new(db.clone(), cart_store.clone(), event_sender.clone()),
            checkout: CheckoutService::new(db.clone(), cart_store, event_sender.clone()),
            orders: OrderService::new(db.clone(), event_sender.clone()),
            users: UserService::new(db, auth, event_sender),
        }
    }
}

/// The versioned API surface.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/dishes", catalog::dishes_routes())
        .nest("/categories", catalog::categories_routes())
        .nest("/cart", carts::cart_routes())
        .nest("/checkout", checkout::checkout_routes())
        .nest("/orders", orders::orders_routes())
        .nest("/admin", admin::admin_routes())
}

pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health::health_check))
}
