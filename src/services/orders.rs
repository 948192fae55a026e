use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    entities::{order, user, Dish, DishModel, Order, OrderModel},
    errors::ServiceError,
    events::{Event, EventSender},
    services::catalog::ListParams,
};

/// Read access to persisted orders plus the administrative status
/// transitions. The core checkout path only creates orders; nothing here
/// ever deletes one.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    pub async fn get_order(&self, order_id: i32) -> Result<OrderModel, ServiceError> {
        Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    /// An order together with its dish snapshot, for confirmation pages.
    pub async fn get_order_with_dishes(
        &self,
        order_id: i32,
    ) -> Result<OrderWithDishes, ServiceError> {
        let order = self.get_order(order_id).await?;
        let dishes = order.find_related(Dish).all(&*self.db).await?;
        Ok(OrderWithDishes { order, dishes })
    }

    /// An order visible to `user`: owners see their own, admins see all.
    pub async fn get_order_for_user(
        &self,
        order_id: i32,
        user: &user::Model,
    ) -> Result<OrderWithDishes, ServiceError> {
        let with_dishes = self.get_order_with_dishes(order_id).await?;
        if with_dishes.order.user_id != user.id && !user.is_admin {
            return Err(ServiceError::Forbidden(
                "order belongs to another user".to_string(),
            ));
        }
        Ok(with_dishes)
    }

    /// All orders owned by a user, newest first.
    pub async fn list_orders_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<OrderWithDishes>, ServiceError> {
        let orders = Order::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::Date)
            .order_by_desc(order::Column::Id)
            .all(&*self.db)
            .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let dishes = order.find_related(Dish).all(&*self.db).await?;
            result.push(OrderWithDishes { order, dishes });
        }
        Ok(result)
    }

    /// Admin listing with search over phone/address and sorting by date or
    /// total, mirroring the other CRUD surfaces.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        params: &ListParams,
    ) -> Result<(Vec<OrderModel>, u64), ServiceError> {
        let mut query = Order::find();
        if let Some(search) = params.search_term() {
            query = query.filter(
                order::Column::Phone
                    .contains(&search)
                    .or(order::Column::Address.contains(&search)),
            );
        }
        query = match params.sort_by.as_deref() {
            Some("total") if params.descending() => query.order_by_desc(order::Column::Total),
            Some("total") => query.order_by_asc(order::Column::Total),
            Some("date") if params.descending() => query.order_by_desc(order::Column::Date),
            Some("date") => query.order_by_asc(order::Column::Date),
            _ => query.order_by_desc(order::Column::Date),
        };

        let paginator = query.paginate(&*self.db, params.per_page());
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(params.zero_based_page()).await?;
        Ok((orders, total))
    }

    /// Advances an order one step along New -> Processing -> Completed.
    /// Administrative only; there is no backward transition.
    #[instrument(skip(self))]
    pub async fn advance_status(&self, order_id: i32) -> Result<OrderModel, ServiceError> {
        let order = self.get_order(order_id).await?;
        let old_status = order.status;
        let new_status = old_status.next().ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Order {} is already {} and cannot advance",
                order_id, old_status
            ))
        })?;

        let mut active: order::ActiveModel = order.into();
        active.status = Set(new_status);
        let updated = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderStatusChanged {
                order_id,
                old_status: old_status.to_string(),
                new_status: new_status.to_string(),
            })
            .await;
        info!(order_id, %old_status, %new_status, "order status advanced");
        Ok(updated)
    }
}

#[derive(Debug, Serialize)]
pub struct OrderWithDishes {
    pub order: OrderModel,
    pub dishes: Vec<DishModel>,
}
