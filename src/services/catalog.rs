use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    entities::{
        category, category_dish, dish, Category, CategoryDish, CategoryModel, Dish, DishModel,
        Order,
    },
    errors::ServiceError,
};

/// Read side of the catalog plus the administrative CRUD over dishes and
/// categories. The cart and checkout services consume only the lookups.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn get_dish(&self, dish_id: i32) -> Result<DishModel, ServiceError> {
        Dish::find_by_id(dish_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Dish {} not found", dish_id)))
    }

    /// All dishes a given cart references, in ascending id order. Fails with
    /// `NotFound` if any id no longer resolves.
    pub async fn resolve_dishes(&self, dish_ids: &[i32]) -> Result<Vec<DishModel>, ServiceError> {
        let mut dishes = Vec::with_capacity(dish_ids.len());
        for dish_id in dish_ids {
            dishes.push(self.get_dish(*dish_id).await?);
        }
        Ok(dishes)
    }

    #[instrument(skip(self))]
    pub async fn list_dishes(
        &self,
        params: &ListParams,
    ) -> Result<(Vec<DishModel>, u64), ServiceError> {
        let mut query = Dish::find();
        if let Some(search) = params.search_term() {
            query = query.filter(
                dish::Column::Title
                    .contains(&search)
                    .or(dish::Column::Description.contains(&search)),
            );
        }
        query = match params.sort_by.as_deref() {
            Some("price") if params.descending() => query.order_by_desc(dish::Column::Price),
            Some("price") => query.order_by_asc(dish::Column::Price),
            Some("title") if params.descending() => query.order_by_desc(dish::Column::Title),
            Some("title") => query.order_by_asc(dish::Column::Title),
            _ => query.order_by_asc(dish::Column::Id),
        };

        let paginator = query.paginate(&*self.db, params.per_page());
        let total = paginator.num_items().await?;
        let dishes = paginator.fetch_page(params.zero_based_page()).await?;
        Ok((dishes, total))
    }

    /// Categories with their dishes, for menu rendering.
    pub async fn list_categories(
        &self,
    ) -> Result<Vec<(CategoryModel, Vec<DishModel>)>, ServiceError> {
        Category::find()
            .order_by_asc(category::Column::Id)
            .find_with_related(Dish)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    pub async fn get_category(&self, category_id: i32) -> Result<CategoryModel, ServiceError> {
        Category::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", category_id)))
    }

    pub async fn dishes_in_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<DishModel>, ServiceError> {
        let category = self.get_category(category_id).await?;
        category
            .find_related(Dish)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn create_dish(&self, input: DishInput) -> Result<DishModel, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;

        for category_id in &input.category_ids {
            if Category::find_by_id(*category_id).one(&txn).await?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Category {} not found",
                    category_id
                )));
            }
        }

        let dish = dish::ActiveModel {
            title: Set(input.title),
            price: Set(input.price),
            description: Set(input.description),
            picture: Set(input.picture),
            ..Default::default()
        };
        let dish = dish.insert(&txn).await?;

        for category_id in &input.category_ids {
            category_dish::ActiveModel {
                category_id: Set(*category_id),
                dish_id: Set(dish.id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        info!(dish_id = dish.id, "dish created");
        Ok(dish)
    }

    #[instrument(skip(self))]
    pub async fn update_dish(
        &self,
        dish_id: i32,
        input: DishInput,
    ) -> Result<DishModel, ServiceError> {
        input.validate()?;
        let txn = self.db.begin().await?;

        let dish = Dish::find_by_id(dish_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Dish {} not found", dish_id)))?;

        for category_id in &input.category_ids {
            if Category::find_by_id(*category_id).one(&txn).await?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Category {} not found",
                    category_id
                )));
            }
        }

        let mut dish: dish::ActiveModel = dish.into();
        dish.title = Set(input.title);
        dish.price = Set(input.price);
        dish.description = Set(input.description);
        dish.picture = Set(input.picture);
        let dish = dish.update(&txn).await?;

        // Replace the category set wholesale.
        CategoryDish::delete_many()
            .filter(category_dish::Column::DishId.eq(dish_id))
            .exec(&txn)
            .await?;
        for category_id in &input.category_ids {
            category_dish::ActiveModel {
                category_id: Set(*category_id),
                dish_id: Set(dish.id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(dish)
    }

    /// Deletes a dish from the catalog. Dishes referenced by an order are
    /// kept; order history stays resolvable.
    #[instrument(skip(self))]
    pub async fn delete_dish(&self, dish_id: i32) -> Result<(), ServiceError> {
        let dish = self.get_dish(dish_id).await?;

        let referencing_orders = dish.find_related(Order).count(&*self.db).await?;
        if referencing_orders > 0 {
            return Err(ServiceError::Conflict(format!(
                "Dish {} appears in {} orders and cannot be deleted",
                dish_id, referencing_orders
            )));
        }

        dish.delete(&*self.db).await?;
        info!(dish_id, "dish deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn create_category(&self, input: CategoryInput) -> Result<CategoryModel, ServiceError> {
        input.validate()?;
        let existing = Category::find()
            .filter(category::Column::Title.eq(&input.title))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                input.title
            )));
        }

        let category = category::ActiveModel {
            title: Set(input.title),
            ..Default::default()
        };
        category.insert(&*self.db).await.map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        category_id: i32,
        input: CategoryInput,
    ) -> Result<CategoryModel, ServiceError> {
        input.validate()?;
        let category = self.get_category(category_id).await?;

        let duplicate = Category::find()
            .filter(category::Column::Title.eq(&input.title))
            .filter(category::Column::Id.ne(category_id))
            .one(&*self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category '{}' already exists",
                input.title
            )));
        }

        let mut category: category::ActiveModel = category.into();
        category.title = Set(input.title);
        category.update(&*self.db).await.map_err(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, category_id: i32) -> Result<(), ServiceError> {
        let category = self.get_category(category_id).await?;
        category.delete(&*self.db).await?;
        info!(category_id, "category deleted");
        Ok(())
    }
}

/// List parameters shared by the admin CRUD endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    pub fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn zero_based_page(&self) -> u64 {
        self.page.unwrap_or(1).saturating_sub(1)
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn descending(&self) -> bool {
        matches!(self.sort_order.as_deref(), Some("desc") | Some("DESC"))
    }

    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DishInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(range(min = 0))]
    pub price: i64,
    pub description: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
}
