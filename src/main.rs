//! Bookdata Server - in-memory book catalog
//!
//! Loads the catalog from CSV, then serves the REST API.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookdata_server::{
    api,
    config::AppConfig,
    repository::{source::CsvSource, Repository},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookdata_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bookdata Server v{}", env!("CARGO_PKG_VERSION"));

    // Populate the catalog before any request is served
    let source = CsvSource::new(&config.data.books_csv, config.data.has_headers);
    let services = Services::new(Repository::default());
    let loaded = services
        .catalog
        .initialize(&source)
        .with_context(|| format!("Failed to load books from {}", source.path().display()))?;

    tracing::info!("Catalog ready with {} books", loaded);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(config, services);
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
