use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use audiowave_api::config::{ApiConfig, StoreBackend};
use audiowave_api::http;
use audiowave_api::state::AppState;
use audiowave_api::store::{DatabaseStore, MemoryStore, Store};
use axum::Router;
use migration::MigratorTrait;
use sea_orm::ConnectOptions;
use sea_orm::Database;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let config = ApiConfig::load().context("Failed to load configuration")?;
    let store = build_store(&config).await?;
    let app_state = AppState::new(store, &config);

    let listener = TcpListener::bind(config.server.address())
        .await
        .context("Failed to bind HTTP listener")?;
    let local_addr = listener
        .local_addr()
        .context("Failed to obtain listener address")?;
    info!(
        backend = app_state.store.backend(),
        "AudioWave API listening on {local_addr}"
    );

    let router: Router = http::router(app_state, &config.cors)?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited with error")?;

    Ok(())
}

fn init_tracing() {
    let default_filter = "info";
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    assert!(!filter.is_empty(), "Tracing filter must not be empty");
    assert!(filter.len() < 256, "Tracing filter length exceeds bounds");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();
}

async fn build_store(config: &ApiConfig) -> Result<Arc<dyn Store>> {
    match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; profiles are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Database => {
            let database = connect_database(config).await?;
            run_migrations(&database).await?;
            Ok(Arc::new(DatabaseStore::new(database)))
        }
    }
}

async fn connect_database(config: &ApiConfig) -> Result<sea_orm::DatabaseConnection> {
    let url = config
        .database
        .url
        .clone()
        .context("database.url is required for the database backend")?;
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.database.max_connections)
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug)
        .acquire_timeout(Duration::from_secs(10));

    if let Some(min) = config.database.min_connections {
        options.min_connections(min);
    }

    Database::connect(options)
        .await
        .context("Failed to connect to PostgreSQL")
}

async fn run_migrations(database: &sea_orm::DatabaseConnection) -> Result<()> {
    migration::Migrator::up(database, None)
        .await
        .context("Database migrations failed")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
