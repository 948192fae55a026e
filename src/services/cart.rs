use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

use crate::{
    cart::Cart,
    entities::DishModel,
    errors::ServiceError,
    events::{Event, EventSender},
    services::CatalogService,
    session::CartStore,
};

/// Session cart manager. Owns the add/remove/view slice of the cart
/// lifecycle; converting a cart into an order belongs to `CheckoutService`.
///
/// Price policy: the unit price is captured when a dish is added and never
/// refreshed, so repeated adds are pure no-ops and the cart total reflects
/// prices as the visitor saw them.
#[derive(Clone)]
pub struct CartService {
    catalog: CatalogService,
    store: Arc<CartStore>,
    event_sender: Arc<EventSender>,
}

impl CartService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        store: Arc<CartStore>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(db),
            store,
            event_sender,
        }
    }

    /// Adds a dish to the session's cart, capturing its current unit price.
    /// Fails with `NotFound` if the dish does not exist; the cart is left
    /// untouched in that case. Adding a dish already in the cart is a no-op.
    #[instrument(skip(self))]
    pub async fn add_item(&self, session_id: &str, dish_id: i32) -> Result<Cart, ServiceError> {
        let dish = self.catalog.get_dish(dish_id).await?;

        let mut cart = self.store.load(session_id);
        let inserted = cart.insert(dish.id, dish.price);
        self.store.save(session_id, cart.clone());

        if inserted {
            self.event_sender
                .send_or_log(Event::CartItemAdded {
                    session_id: session_id.to_string(),
                    dish_id,
                })
                .await;
            info!(dish_id, total = cart.total, "added dish to cart");
        }
        Ok(cart)
    }

    /// Removes a dish from the session's cart. Fails with `NotFound` if the
    /// dish is not in the cart; the stored cart is unchanged on failure.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, session_id: &str, dish_id: i32) -> Result<Cart, ServiceError> {
        let mut cart = self.store.load(session_id);
        if cart.remove(dish_id).is_none() {
            return Err(ServiceError::NotFound(format!(
                "Dish {} is not in the cart",
                dish_id
            )));
        }
        self.store.save(session_id, cart.clone());

        self.event_sender
            .send_or_log(Event::CartItemRemoved {
                session_id: session_id.to_string(),
                dish_id,
            })
            .await;
        info!(dish_id, total = cart.total, "removed dish from cart");
        Ok(cart)
    }

    /// Resolves the cart's dish ids to full dish rows for display, in
    /// ascending id order. Does not mutate the cart. A dish that vanished
    /// from the catalog since it was added surfaces as `NotFound`.
    pub async fn view(&self, session_id: &str) -> Result<(Cart, Vec<DishModel>), ServiceError> {
        let cart = self.store.load(session_id);
        let dishes = self.catalog.resolve_dishes(&cart.dish_ids()).await?;
        Ok((cart, dishes))
    }
}
