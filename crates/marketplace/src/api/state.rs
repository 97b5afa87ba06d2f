//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::MarketplaceConfig;
use crate::infra::{Cache, Database};
use crate::service::Services;

/// Application state (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Business services behind their traits
    pub services: Services,
    /// Redis counters; rate limiting is skipped when absent
    pub cache: Option<Arc<Cache>>,
    /// Database handle, used by the health check
    pub database: Option<Arc<Database>>,
    pub config: Arc<MarketplaceConfig>,
}

impl AppState {
    /// Build the full state over a live database.
    pub fn from_config(
        database: Arc<Database>,
        cache: Option<Arc<Cache>>,
        config: MarketplaceConfig,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), &config);

        Self {
            services,
            cache,
            database: Some(database),
            config: Arc::new(config),
        }
    }

    /// State over already-built services, without infrastructure.
    pub fn new(services: Services, config: MarketplaceConfig) -> Self {
        Self {
            services,
            cache: None,
            database: None,
            config: Arc::new(config),
        }
    }
}
