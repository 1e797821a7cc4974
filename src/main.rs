use std::sync::Arc;

use venuebook::api::router::build_router;
use venuebook::config::AppConfig;
use venuebook::store::mongo::MongoStore;
use venuebook::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Venuebook starting...");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Database: {}", config.database.name);
    tracing::info!("Chunk size: {} KB", config.storage.chunk_size_kb);

    // Connect to the document store
    let store = MongoStore::connect(&config.database.uri, &config.database.name).await?;

    // Build app state and router
    let state = AppState::new(config.clone(), Arc::new(store));
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Venuebook API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
