//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, InMemoryPostStore},
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use blog_core::ports::PostStore;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Post Store ---
    let posts: Arc<dyn PostStore> = if config.database_url == "memory" {
        warn!("DATABASE_URL=memory: posts will not survive a restart");
        Arc::new(InMemoryPostStore::new())
    } else {
        info!("Connecting to database...");
        let db_adapter = DbAdapter::connect(&config.database_url).await?;
        info!("Database schema ready.");
        Arc::new(db_adapter)
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), posts)?);
    info!(
        "Login gate configured for user '{}'",
        config.credentials.username()
    );

    // --- 4. Create the Web Router ---
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
