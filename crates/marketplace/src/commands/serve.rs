//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use common::{AppError, AppResult};

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::MarketplaceConfig;
use crate::infra::{Cache, Database};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: MarketplaceConfig) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Applies pending migrations on connect
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let db = Arc::new(db);

    let cache = match &config.redis_url {
        Some(url) => Some(Arc::new(Cache::connect(url).await?)),
        None => {
            tracing::warn!("REDIS_URL not set, rate limiting is disabled");
            None
        }
    };

    let addr = config.server.addr();
    let app = create_router(AppState::from_config(db, cache, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Peer addresses feed rate limiting when no proxy headers are present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
