//! Token command - development stand-in for the external credential issuer.

use common::AppResult;

use crate::cli::args::TokenArgs;
use crate::config::MarketplaceConfig;
use crate::service::Services;

pub async fn execute(args: TokenArgs, config: MarketplaceConfig) -> AppResult<()> {
    let db = super::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), &config);

    let token = services.auth().token_for_email(&args.email).await?;
    tracing::info!(email = %args.email, expires_in = token.expires_in, "Token issued");
    println!("{}", token.access_token);
    Ok(())
}
