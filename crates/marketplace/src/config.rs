//! Marketplace service configuration.

use std::env;

use chrono::Duration;
use common::{AppError, AppResult, DatabaseConfig, JwtConfig, RateLimitConfig, ServiceConfig};
use domain::{DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SUBSCRIPTION_DAYS, MIN_JWT_SECRET_LENGTH};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Marketplace configuration.
#[derive(Clone)]
pub struct MarketplaceConfig {
    /// Bind address
    pub server: ServiceConfig,
    /// Postgres connection and pool sizing
    pub database: DatabaseConfig,
    /// Redis URL for rate limiting; limiting is off when unset
    pub redis_url: Option<String>,
    /// Bearer token signing settings
    pub jwt: JwtConfig,
    /// General endpoint limits
    pub rate_limit: RateLimitConfig,
    /// Stricter limits for registration
    pub auth_rate_limit: RateLimitConfig,
    /// Length of a subscription period when no expiry is given
    pub subscription_period_days: i64,
}

impl std::fmt::Debug for MarketplaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceConfig")
            .field("server", &self.server)
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database.max_connections)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt", &self.jwt)
            .field("rate_limit", &self.rate_limit)
            .field("auth_rate_limit", &self.auth_rate_limit)
            .field("subscription_period_days", &self.subscription_period_days)
            .finish()
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl MarketplaceConfig {
    /// Load configuration from environment variables.
    ///
    /// `JWT_SECRET` must be set outside debug builds and be long enough.
    pub fn from_env() -> AppResult<Self> {
        let secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            server: ServiceConfig {
                service_name: "marketplace".to_string(),
                host: env::var("MARKETPLACE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parsed("MARKETPLACE_PORT", 3000),
            },
            database: DatabaseConfig {
                url: env::var("MARKETPLACE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or_else(|_| DatabaseConfig::default().url),
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS", 1),
            },
            redis_url: env::var("MARKETPLACE_REDIS_URL")
                .or_else(|_| env::var("REDIS_URL"))
                .ok()
                .filter(|url| !url.is_empty()),
            jwt: JwtConfig {
                secret,
                expiration_hours: parsed("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
            },
            rate_limit: RateLimitConfig {
                max_requests: parsed("RATE_LIMIT_REQUESTS", 100),
                window_seconds: parsed("RATE_LIMIT_WINDOW_SECONDS", 60),
            },
            auth_rate_limit: RateLimitConfig {
                max_requests: parsed("RATE_LIMIT_AUTH_REQUESTS", 10),
                window_seconds: parsed("RATE_LIMIT_AUTH_WINDOW_SECONDS", 60),
            },
            subscription_period_days: parsed("SUBSCRIPTION_PERIOD_DAYS", DEFAULT_SUBSCRIPTION_DAYS),
        })
    }

    pub fn subscription_period(&self) -> Duration {
        Duration::days(self.subscription_period_days)
    }
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            server: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            redis_url: None,
            jwt: JwtConfig {
                secret: DEV_JWT_SECRET.to_string(),
                expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            },
            rate_limit: RateLimitConfig::default(),
            auth_rate_limit: RateLimitConfig {
                max_requests: 10,
                window_seconds: 60,
            },
            subscription_period_days: DEFAULT_SUBSCRIPTION_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let config = MarketplaceConfig {
            redis_url: Some("redis://:hunter2@cache:6379".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("password@localhost"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains(DEV_JWT_SECRET));
        assert!(rendered.contains("0.0.0.0"));
    }

    #[test]
    fn default_period_is_thirty_days() {
        let config = MarketplaceConfig::default();
        assert_eq!(config.subscription_period(), Duration::days(30));
        assert_eq!(config.server.addr(), "0.0.0.0:3000");
    }
}
