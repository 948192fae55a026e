use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Application configuration, layered from `config/*.toml` files and
/// `APP__`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// JWT signing secret (minimum 32 characters)
    #[validate(length(min = 32))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub jwt_expiration: usize,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment (development/production/test)
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub db_min_connections: u32,

    /// Optional JSON file with catalog seed data, applied after migrations.
    #[serde(default)]
    pub seed_file: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "test"
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    Missing(String),
}

pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    // jwt_secret has no default on purpose: it must come from the
    // environment or a config file.
    let config = Config::builder()
        .set_default("database_url", "sqlite://food_delivery.db?mode=rwc")?
        .set_default("jwt_expiration", 3600)?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    if config.get_string("jwt_secret").is_err() {
        return Err(AppConfigError::Missing(
            "jwt_secret is not configured; set APP__JWT_SECRET or add it to a config file"
                .to_string(),
        ));
    }

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

/// Initializes the global tracing subscriber. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directive = format!("food_delivery_api={},tower_http=info", level);
    let filter = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true);

    // Init fails when a subscriber is already installed (tests, embedding).
    if json {
        builder.json().try_init().ok();
    } else {
        builder.try_init().ok();
    }
}
