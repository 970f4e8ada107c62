//! Catalog Service - book catalog REST server

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_service::{
    api,
    config::{AppConfig, DatabaseConfig},
    repository::{BookRepository, InMemoryBookRepository, PgBookRepository},
    services::{testdata, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("catalog_service={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Catalog Service v{}", env!("CARGO_PKG_VERSION"));

    let repository = connect_storage(&config.database).await?;

    if config.catalog.testdata {
        testdata::load_test_data(repository.as_ref())
            .await
            .context("Failed to load test data")?;
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(repository)),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// PostgreSQL when a database URL is configured, in-memory otherwise
async fn connect_storage(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn BookRepository>> {
    let Some(url) = config.url.as_deref() else {
        tracing::warn!("No database configured, books are kept in memory");
        return Ok(Arc::new(InMemoryBookRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    Ok(Arc::new(PgBookRepository::new(pool)))
}
