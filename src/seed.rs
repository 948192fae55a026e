//! Catalog seeding from a JSON fixture.
//!
//! The fixture is a list of categories, each carrying its dishes. Seeding
//! is skipped entirely when the catalog already has data, so it is safe to
//! leave enabled across restarts.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::entities::{category, category_dish, dish, Dish};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize)]
struct SeedCategory {
    title: String,
    dishes: Vec<SeedDish>,
}

#[derive(Debug, Deserialize)]
struct SeedDish {
    title: String,
    price: i64,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

/// Loads the fixture at `path` and inserts its categories and dishes.
/// Returns the number of dishes inserted, or 0 when the catalog was
/// already populated.
#[instrument(skip(db))]
pub async fn seed_catalog(
    db: &Arc<DatabaseConnection>,
    path: &str,
) -> Result<usize, ServiceError> {
    let existing = Dish::find().count(&**db).await?;
    if existing > 0 {
        info!(existing, "catalog already populated, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        ServiceError::InternalError(format!("Failed to read seed file {}: {}", path, e))
    })?;
    let categories: Vec<SeedCategory> = serde_json::from_str(&raw).map_err(|e| {
        ServiceError::ValidationError(format!("Malformed seed file {}: {}", path, e))
    })?;

    let txn = db.begin().await?;
    let mut inserted = 0usize;

    for seed_category in categories {
        let category = category::ActiveModel {
            title: Set(seed_category.title),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for seed_dish in seed_category.dishes {
            let dish = dish::ActiveModel {
                title: Set(seed_dish.title),
                price: Set(seed_dish.price),
                description: Set(seed_dish.description),
                picture: Set(seed_dish.picture),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            category_dish::ActiveModel {
                category_id: Set(category.id),
                dish_id: Set(dish.id),
            }
            .insert(&txn)
            .await?;

            inserted += 1;
        }
    }

    txn.commit().await?;
    info!(inserted, "catalog seeded");
    Ok(inserted)
}
