use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A dish available for ordering. Prices are stored in minor currency units.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub price: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(nullable)]
    pub picture: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_dish::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_dish::Relation::Dish.def().rev())
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        super::order_dish::Relation::Order.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::order_dish::Relation::Dish.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
