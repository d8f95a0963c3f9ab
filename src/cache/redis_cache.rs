//! Redis-backed exchange-rate cache

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use super::{CacheError, ExchangeRateCache};

/// Exchange-rate cache stored in Redis as decimal strings with `EX` expiry
#[derive(Clone)]
pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with a PING
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        let cache = Self { conn };
        cache.ping().await?;

        tracing::info!("Redis cache connected");
        Ok(cache)
    }

    /// Check that Redis is reachable
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl ExchangeRateCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<f64>, CacheError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(key).await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match raw.parse::<f64>() {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %key, value = %raw, error = %e, "Unparseable cached value, treating as miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: f64, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value.to_string())
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await?;

        tracing::debug!(key = %key, value, ttl_secs = ttl.as_secs(), "Cached exchange rate");
        Ok(())
    }
}
