//! Redis-backed request counters for rate limiting.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use common::{AppError, AppResult};

const RATE_LIMIT_PREFIX: &str = "rate_limit:";

/// Redis connection wrapper.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis connected");
        Ok(Self { connection })
    }

    /// Count one request for `identifier` in the current fixed window.
    ///
    /// Returns the count so far and whether it is within `max_requests`.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", RATE_LIMIT_PREFIX, identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }

    /// Seconds until the window for `identifier` resets, if a window is open.
    pub async fn get_rate_limit_ttl(&self, identifier: &str) -> AppResult<Option<u64>> {
        let key = format!("{}{}", RATE_LIMIT_PREFIX, identifier);
        let mut conn = self.connection.clone();
        let ttl: i64 = conn.ttl(&key).await.map_err(cache_error)?;
        Ok((ttl > 0).then_some(ttl as u64))
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }
}

fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::Cache(e)
}
