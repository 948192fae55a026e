use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::{config::AppConfig, errors::ServiceError, migrator::Migrator};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Establishes a connection pool using settings from the app config.
pub async fn establish_connection(config: &AppConfig) -> Result<DbPool, ServiceError> {
    debug!("Connecting to database at {}", config.database_url);

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    let pool = Database::connect(opt).await?;
    info!(
        "Database connected (max_connections={})",
        config.db_max_connections
    );
    Ok(pool)
}

/// Applies all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Running database migrations");
    Migrator::up(pool, None).await?;
    info!("Migrations complete");
    Ok(())
}
