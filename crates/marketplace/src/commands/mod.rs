//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod serve;
pub mod token;

use common::{AppError, AppResult};

use crate::config::MarketplaceConfig;
use crate::infra::Database;

/// Connect without running pending migrations.
async fn connect(config: &MarketplaceConfig) -> AppResult<Database> {
    Database::connect_without_migrations(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))
}
