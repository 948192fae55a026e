use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::dish::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_dish::Relation::Dish.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_dish::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
