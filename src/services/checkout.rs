use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    entities::{order, order_dish, Dish, OrderModel, User},
    errors::ServiceError,
    events::{Event, EventSender},
    session::CartStore,
};

/// Converts a session cart into a persisted order, exactly once.
///
/// The order's `total` is the cart's stored total (price-at-add-time), not a
/// recomputation from live catalog prices; dish ids are re-resolved only to
/// prove they still exist. The order row and all dish associations are
/// written in one transaction, and the session cart is cleared only after
/// the commit succeeds, so a failed checkout leaves the cart intact.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
    store: Arc<CartStore>,
    event_sender: Arc<EventSender>,
}

impl CheckoutService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        store: Arc<CartStore>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            db,
            store,
            event_sender,
        }
    }

    #[instrument(skip(self, current_user))]
    pub async fn checkout(
        &self,
        session_id: &str,
        input: CheckoutInput,
        current_user: CurrentUser,
    ) -> Result<OrderModel, ServiceError> {
        input.validate()?;

        let user = current_user.require_authenticated()?;
        // Re-resolve against persistence; the token may outlive the account.
        let user = User::find_by_id(user.id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user.id)))?;

        let cart = self.store.load(session_id);
        if cart.is_empty() {
            return Err(ServiceError::ValidationError(
                "Cannot check out an empty cart".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        for dish_id in cart.dish_ids() {
            if Dish::find_by_id(dish_id).one(&txn).await?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Dish {} is no longer available",
                    dish_id
                )));
            }
        }

        let order = order::ActiveModel {
            date: Set(Utc::now()),
            total: Set(cart.total),
            status: Set(order::OrderStatus::New),
            phone: Set(input.phone),
            address: Set(input.address),
            user_id: Set(user.id),
            ..Default::default()
        };
        let order = order.insert(&txn).await?;

        for dish_id in cart.dish_ids() {
            order_dish::ActiveModel {
                order_id: Set(order.id),
                dish_id: Set(dish_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        // Only now is the cart safe to discard.
        self.store.clear(session_id);

        self.event_sender
            .send_or_log(Event::OrderCreated(order.id))
            .await;
        info!(
            order_id = order.id,
            user_id = user.id,
            total = order.total,
            "checkout completed"
        );
        Ok(order)
    }
}

/// Shipping details collected at checkout. Limits follow the order form:
/// free-text name and address capped, phone between 10 and 15 characters.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutInput {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 10, max = 15, message = "phone must be 10-15 characters"))]
    pub phone: String,
    #[validate(length(min = 1, max = 200, message = "address must be 1-200 characters"))]
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CheckoutInput {
        CheckoutInput {
            name: "Ada Lovelace".to_string(),
            phone: "79990001122".to_string(),
            address: "1 Analytical Engine Way".to_string(),
        }
    }

    #[test]
    fn valid_shipping_info_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut input = valid_input();
        input.phone = "12345".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn overlong_name_and_address_are_rejected() {
        let mut input = valid_input();
        input.name = "x".repeat(51);
        assert!(input.validate().is_err());

        let mut input = valid_input();
        input.address = "x".repeat(201);
        assert!(input.validate().is_err());
    }
}
