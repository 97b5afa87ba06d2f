//! Seed command - installs the default plan catalogue.

use common::AppResult;

use crate::config::MarketplaceConfig;
use crate::service::Services;

pub async fn execute(config: MarketplaceConfig) -> AppResult<()> {
    let db = super::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), &config);

    let created = services.subscriptions().initialize_default_plans().await?;
    if created == 0 {
        println!("Plans already exist, nothing to seed");
    } else {
        println!("Created {} plans", created);
    }
    Ok(())
}
