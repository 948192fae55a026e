use std::{net::SocketAddr, sync::Arc};

use tokio::{signal, sync::mpsc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use food_delivery_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);

    let db_pool = api::db::establish_connection(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }
    let db = Arc::new(db_pool);

    if let Some(seed_file) = cfg.seed_file.clone() {
        let inserted = api::seed::seed_catalog(&db, &seed_file).await?;
        if inserted > 0 {
            info!(inserted, "seeded catalog from {}", seed_file);
        }
    }

    let (event_tx, event_rx) = mpsc::channel(1024);
    let event_sender = Arc::new(api::events::EventSender::new(event_tx));
    tokio::spawn(api::events::process_events(event_rx));

    let state = Arc::new(api::AppState::new(db, cfg.clone(), event_sender));

    let cors_layer = if cfg.is_development() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_methods(Any).allow_headers(Any)
    };
    let app = api::app_router(state).layer(cors_layer);

    let addr = SocketAddr::new(cfg.host.parse()?, cfg.port);
    info!("food-delivery-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
