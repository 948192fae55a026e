use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A placed order. `total` is frozen at checkout time; the dish association
/// is a snapshot of ids only and does not preserve historical prices.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: DateTime<Utc>,
    pub total: i64,
    pub status: OrderStatus,
    pub phone: String,
    pub address: String,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::dish::Entity> for Entity {
    fn to() -> RelationDef {
        super::order_dish::Relation::Dish.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::order_dish::Relation::Order.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle stage of an order. Advanced only by administrative action,
/// strictly forward: New -> Processing -> Completed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl OrderStatus {
    /// The single legal successor of this status, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_progression_is_one_directional() {
        assert_eq!(OrderStatus::New.next(), Some(OrderStatus::Processing));
        assert_eq!(
            OrderStatus::Processing.next(),
            Some(OrderStatus::Completed)
        );
        assert_eq!(OrderStatus::Completed.next(), None);
    }

    #[test]
    fn backward_and_skipping_transitions_are_rejected() {
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::New));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn allowed_transitions_are_accepted() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Completed));
    }
}
